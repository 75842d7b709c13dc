//! Websocket connection listener
//!
//! One task per accepted connection, each running the same loop: receive
//! one text frame, dispatch it, write exactly one response frame back.
//! A bad message produces an error envelope and the loop keeps going;
//! only a transport failure or a close frame ends it. Dispatch is
//! serialized within a connection — there is no intra-connection
//! pipelining — while separate connections proceed in parallel.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        ConnectInfo, State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use gridwire_protocol::jsonrpc::JsonRpcResponse;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::registry::HandlerRegistry;
use crate::router::RequestRouter;

/// Websocket server for a handler registry.
#[derive(Debug)]
pub struct WsServer {
    router: Arc<RequestRouter>,
}

impl WsServer {
    /// Create a server over a registry.
    pub fn new(registry: Arc<HandlerRegistry>, config: ServerConfig) -> Self {
        Self {
            router: Arc::new(RequestRouter::new(registry, config)),
        }
    }

    /// Bind and start accepting connections.
    ///
    /// Binding to port 0 picks a free port; the handle exposes the
    /// resolved address.
    pub async fn start(self, addr: impl ToSocketAddrs) -> ServerResult<ServerHandle> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let app = Router::new()
            .route("/", get(ws_upgrade))
            .with_state(self.router);

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let serve = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
            });
            if let Err(err) = serve.await {
                error!(%err, "listener terminated");
            }
        });

        info!("listening on ws://{local_addr}");
        Ok(ServerHandle {
            local_addr,
            shutdown: shutdown_tx,
            task,
        })
    }
}

/// Handle to a running server: its address and lifecycle control.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// The address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Websocket URL clients can connect to.
    pub fn url(&self) -> String {
        format!("ws://{}", self.local_addr)
    }

    /// Signal shutdown and wait for the listener task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    /// Run until the listener task exits on its own.
    pub async fn wait(self) {
        let _ = self.task.await;
    }
}

async fn ws_upgrade(
    State(router): State<Arc<RequestRouter>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, router, peer))
}

/// Per-connection dispatch loop.
async fn handle_connection(mut socket: WebSocket, router: Arc<RequestRouter>, peer: SocketAddr) {
    info!(%peer, "client connected");

    while let Some(frame) = socket.recv().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(err) => {
                warn!(%peer, %err, "transport failure");
                break;
            }
        };

        let response = match frame {
            Message::Text(text) => router.dispatch(text.as_str()).await,
            // Every frame must carry one JSON text envelope.
            Message::Binary(_) => JsonRpcResponse::parse_error(),
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(_) => break,
        };

        let encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(%peer, %err, "response serialization failed");
                continue;
            }
        };

        if let Err(err) = socket.send(Message::Text(encoded.into())).await {
            warn!(%peer, %err, "write failed, closing connection");
            break;
        }
    }

    debug!(%peer, "connection closed");
}
