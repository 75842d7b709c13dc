//! # Gridwire Server
//!
//! Server side of the Gridwire protocol: a registry of named tool and
//! resource handlers, a dispatcher that turns inbound JSON-RPC envelopes
//! into handler invocations, and an axum-based websocket listener that
//! runs one dispatch loop per accepted connection.
//!
//! The protocol layer holds no application state. Handlers capture
//! whatever state they mutate at registration time; the dispatcher only
//! routes, invokes, and encodes outcomes (success or typed error) back
//! into envelopes.
//!
//! ```no_run
//! use std::sync::Arc;
//! use gridwire_protocol::types::{Tool, ToolInputSchema};
//! use gridwire_server::{
//!     config::ServerConfig, handlers::FunctionToolHandler, registry::HandlerRegistry,
//!     ws::WsServer,
//! };
//!
//! # async fn run() -> Result<(), gridwire_server::error::ServerError> {
//! let registry = Arc::new(HandlerRegistry::new());
//! registry.register_tool(FunctionToolHandler::new(
//!     Tool {
//!         name: "ping".to_string(),
//!         description: "Reply with pong".to_string(),
//!         input_schema: ToolInputSchema::empty(),
//!     },
//!     |_args| async { Ok("pong".to_string()) },
//! ));
//!
//! let server = WsServer::new(registry, ServerConfig::default());
//! let handle = server.start("127.0.0.1:8000").await?;
//! handle.wait().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod router;
pub mod ws;

pub use config::ServerConfig;
pub use error::{DispatchError, HandlerError, ServerError};
pub use handlers::{FunctionResourceHandler, FunctionToolHandler, ResourceHandler, ToolHandler};
pub use registry::HandlerRegistry;
pub use router::RequestRouter;
pub use ws::{ServerHandle, WsServer};
