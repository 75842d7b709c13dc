//! Protocol client
//!
//! Owns the connection: the write half, the dispatcher (which owns the
//! read half), and the request-id counter. `connect` performs the
//! `initialize` handshake before handing the client out, so every
//! client in caller hands is past the handshake by construction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::SinkExt;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use gridwire_protocol::jsonrpc::{JsonRpcRequest, JsonRpcResponsePayload};
use gridwire_protocol::types::{
    methods, CallToolRequest, CallToolResult, ClientCapabilities, Content, Implementation,
    InitializeRequest, InitializeResult, ListResourcesResult, ListToolsResult,
    ReadResourceRequest, ReadResourceResult, RequestId, Resource, RootsCapability, Tool,
    PROTOCOL_VERSION,
};

use crate::dispatcher::MessageDispatcher;
use crate::error::{ClientError, ClientResult};
use crate::transport::{self, WsWriter};

/// Client-side connection settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Deadline for each request; a request with no matching response
    /// by then fails with [`ClientError::Timeout`] without disturbing
    /// other pending requests.
    pub request_timeout: Duration,
    /// Client identity sent as `clientInfo`
    pub client_info: Implementation,
    /// Protocol version sent as `protocolVersion`
    pub protocol_version: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            client_info: Implementation::new("gridwire-client", env!("CARGO_PKG_VERSION")),
            protocol_version: PROTOCOL_VERSION.to_string(),
        }
    }
}

/// One websocket connection with request/response correlation.
///
/// Identifiers are allocated from an atomic counter starting at 1,
/// stringified, and never reused for the life of the connection. Any
/// number of call sites may share the client; each blocks only on its
/// own pending request.
#[derive(Debug)]
pub struct Client {
    writer: Mutex<WsWriter>,
    dispatcher: Arc<MessageDispatcher>,
    next_id: AtomicU64,
    config: ClientConfig,
    server: InitializeResult,
}

impl Client {
    /// Connect with default settings and perform the handshake.
    pub async fn connect(url: &str) -> ClientResult<Self> {
        Self::connect_with(url, ClientConfig::default()).await
    }

    /// Connect with explicit settings and perform the handshake.
    ///
    /// The handshake must complete before any tool or resource call is
    /// valid, so a handshake failure tears the connection down and
    /// propagates instead of returning a half-connected client.
    pub async fn connect_with(url: &str, config: ClientConfig) -> ClientResult<Self> {
        let (writer, reader) = transport::connect(url).await?;
        let dispatcher = MessageDispatcher::spawn(reader);

        let connection = Connection {
            writer: Mutex::new(writer),
            dispatcher,
            next_id: AtomicU64::new(1),
            config,
        };

        let server = match connection.initialize().await {
            Ok(server) => server,
            Err(err) => {
                connection.close().await;
                return Err(ClientError::Handshake(err.to_string()));
            }
        };

        if server.protocol_version != connection.config.protocol_version {
            warn!(
                server_version = %server.protocol_version,
                client_version = %connection.config.protocol_version,
                "protocol version mismatch"
            );
        }
        debug!(server = %server.server_info.name, "connected");

        Ok(Self {
            writer: connection.writer,
            dispatcher: connection.dispatcher,
            next_id: connection.next_id,
            config: connection.config,
            server,
        })
    }

    /// The server identity from the handshake.
    pub fn server_info(&self) -> &Implementation {
        &self.server.server_info
    }

    /// List the server's tools.
    pub async fn list_tools(&self) -> ClientResult<Vec<Tool>> {
        let result = self.request(methods::TOOLS_LIST, Some(Value::Object(Map::new()))).await?;
        let listing: ListToolsResult = serde_json::from_value(result)?;
        Ok(listing.tools)
    }

    /// Invoke a tool and return its text output.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> ClientResult<String> {
        let params = serde_json::to_value(CallToolRequest {
            name: name.to_string(),
            arguments,
        })?;
        let result = self.request(methods::TOOLS_CALL, Some(params)).await?;
        let result: CallToolResult = serde_json::from_value(result)?;

        Ok(result
            .content
            .into_iter()
            .find_map(|content| match content {
                Content::Text { text } => Some(text),
            })
            .unwrap_or_default())
    }

    /// List the server's resources.
    pub async fn list_resources(&self) -> ClientResult<Vec<Resource>> {
        let result = self
            .request(methods::RESOURCES_LIST, Some(Value::Object(Map::new())))
            .await?;
        let listing: ListResourcesResult = serde_json::from_value(result)?;
        Ok(listing.resources)
    }

    /// Read a resource and return its text contents.
    pub async fn read_resource(&self, uri: &str) -> ClientResult<String> {
        let params = serde_json::to_value(ReadResourceRequest {
            uri: uri.to_string(),
        })?;
        let result = self.request(methods::RESOURCES_READ, Some(params)).await?;
        let result: ReadResourceResult = serde_json::from_value(result)?;

        Ok(result
            .contents
            .into_iter()
            .map(|contents| contents.text)
            .next()
            .unwrap_or_default())
    }

    /// Close the connection.
    ///
    /// Every request still outstanding observes
    /// [`ClientError::ConnectionClosed`].
    pub async fn disconnect(&self) {
        let mut writer = self.writer.lock().await;
        let _ = writer.send(Message::Close(None)).await;
        let _ = writer.close().await;
        self.dispatcher.shutdown();
    }

    /// Send one request and await the response bearing its id.
    async fn request(&self, method: &str, params: Option<Value>) -> ClientResult<Value> {
        send_request(
            &self.writer,
            &self.dispatcher,
            &self.next_id,
            self.config.request_timeout,
            method,
            params,
        )
        .await
    }
}

/// Connection state before the handshake has completed.
///
/// Same wiring as [`Client`] minus the handshake result; only `connect_with`
/// sees this type.
struct Connection {
    writer: Mutex<WsWriter>,
    dispatcher: Arc<MessageDispatcher>,
    next_id: AtomicU64,
    config: ClientConfig,
}

impl Connection {
    async fn initialize(&self) -> ClientResult<InitializeResult> {
        let params = serde_json::to_value(InitializeRequest {
            protocol_version: self.config.protocol_version.clone(),
            capabilities: ClientCapabilities {
                roots: Some(RootsCapability {
                    list_changed: false,
                }),
            },
            client_info: self.config.client_info.clone(),
        })?;

        let result = send_request(
            &self.writer,
            &self.dispatcher,
            &self.next_id,
            self.config.request_timeout,
            methods::INITIALIZE,
            Some(params),
        )
        .await?;

        Ok(serde_json::from_value(result)?)
    }

    async fn close(&self) {
        let mut writer = self.writer.lock().await;
        let _ = writer.close().await;
        self.dispatcher.shutdown();
    }
}

/// The send path shared by the handshake and steady-state requests.
///
/// Order matters: the pending entry is registered *before* the write, so
/// a response cannot race past an empty table; requests go out in the
/// order call sites reach the writer lock.
async fn send_request(
    writer: &Mutex<WsWriter>,
    dispatcher: &MessageDispatcher,
    next_id: &AtomicU64,
    deadline: Duration,
    method: &str,
    params: Option<Value>,
) -> ClientResult<Value> {
    let id = next_id.fetch_add(1, Ordering::SeqCst).to_string();
    let request = JsonRpcRequest::new(method, params, RequestId::String(id.clone()));
    let encoded = serde_json::to_string(&request)?;

    let receiver = dispatcher.register(id.clone());

    {
        let mut writer = writer.lock().await;
        if let Err(err) = writer.send(Message::Text(encoded.into())).await {
            dispatcher.discard(&id);
            return Err(ClientError::Transport(err.to_string()));
        }
    }
    debug!(method, id = %id, "request sent");

    match tokio::time::timeout(deadline, receiver).await {
        Ok(Ok(response)) => match response.payload {
            JsonRpcResponsePayload::Success { result } => Ok(result),
            JsonRpcResponsePayload::Error { error } => Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            }),
        },
        // Sender dropped: the reader task tore the pending table down.
        Ok(Err(_closed)) => Err(ClientError::ConnectionClosed),
        Err(_elapsed) => {
            dispatcher.discard(&id);
            warn!(method, id = %id, "request timed out");
            Err(ClientError::Timeout(deadline))
        }
    }
}
