//! # Gridwire Client
//!
//! Client side of the Gridwire protocol. A [`Client`] owns one websocket
//! connection, performs the `initialize` handshake on connect, and then
//! correlates every request it sends with the response bearing the same
//! identifier — responses may arrive in any order, interleaved across
//! concurrent call sites sharing the connection.
//!
//! The correlation machinery is a single background reader task (the
//! sole consumer of the inbound stream) plus a pending-request table of
//! one-shot channels keyed by request id. Each call site blocks only on
//! its own channel; teardown wakes every outstanding waiter with a
//! connection-closed failure instead of leaving it to hang.
//!
//! ```no_run
//! use gridwire_client::Client;
//!
//! # async fn run() -> Result<(), gridwire_client::ClientError> {
//! let client = Client::connect("ws://127.0.0.1:8000").await?;
//! let tools = client.list_tools().await?;
//! println!("{} tools", tools.len());
//! let board = client.call_tool("get_board", Default::default()).await?;
//! println!("{board}");
//! client.disconnect().await;
//! # Ok(())
//! # }
//! ```

mod client;
mod dispatcher;
mod error;
mod transport;

pub use client::{Client, ClientConfig};
pub use error::{ClientError, ClientResult};
