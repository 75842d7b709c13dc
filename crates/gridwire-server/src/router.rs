//! Request dispatch
//!
//! One inbound text frame in, one response envelope out, terminal in a
//! single step. Malformed input becomes a `-32700` envelope with a null
//! id; everything after a successful parse is routed by method name and
//! any failure is converted to a typed error carrying the request's id.
//! Nothing here can escape as a panic or a raw error — the connection
//! loop always gets an envelope to write back.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use gridwire_protocol::jsonrpc::{
    wire::IncomingRequest, JsonRpcResponse, JsonRpcResponsePayload, JsonRpcVersion, ResponseId,
};
use gridwire_protocol::types::{
    methods, CallToolRequest, CallToolResult, InitializeRequest, InitializeResult,
    ListResourcesResult, ListToolsResult, ReadResourceRequest, ReadResourceResult,
    ServerCapabilities,
};

use crate::config::ServerConfig;
use crate::error::DispatchError;
use crate::registry::HandlerRegistry;

/// Routes decoded requests to the fixed handshake handler or to registry
/// lookup, and encodes each outcome back into an envelope.
#[derive(Debug)]
pub struct RequestRouter {
    registry: Arc<HandlerRegistry>,
    config: ServerConfig,
}

impl RequestRouter {
    /// Create a router over a registry.
    pub fn new(registry: Arc<HandlerRegistry>, config: ServerConfig) -> Self {
        Self { registry, config }
    }

    /// Dispatch one inbound text frame to a response envelope.
    pub async fn dispatch(&self, text: &str) -> JsonRpcResponse {
        let incoming = match IncomingRequest::parse(text) {
            Ok(incoming) => incoming,
            Err(err) => {
                debug!(%err, "discarding unparseable frame");
                return JsonRpcResponse::parse_error();
            }
        };

        let id = ResponseId(incoming.request_id());

        // An envelope without a method is as unusable as one that does
        // not parse.
        let Some(method) = incoming.method.as_deref() else {
            debug!("frame has no method field");
            return JsonRpcResponse::parse_error();
        };

        debug!(method, "dispatching request");
        match self.route(method, incoming.params).await {
            Ok(result) => JsonRpcResponse {
                jsonrpc: JsonRpcVersion,
                payload: JsonRpcResponsePayload::Success { result },
                id,
            },
            Err(err) => {
                warn!(method, %err, "request failed");
                JsonRpcResponse::error(err.to_json_rpc(), id)
            }
        }
    }

    async fn route(&self, method: &str, params: Option<Value>) -> Result<Value, DispatchError> {
        match method {
            methods::INITIALIZE => self.initialize(params),
            methods::TOOLS_LIST => encode(ListToolsResult {
                tools: self.registry.list_tools(),
            }),
            methods::TOOLS_CALL => self.call_tool(params).await,
            methods::RESOURCES_LIST => encode(ListResourcesResult {
                resources: self.registry.list_resources(),
            }),
            methods::RESOURCES_READ => self.read_resource(params).await,
            other => Err(DispatchError::MethodNotFound {
                method: other.to_string(),
            }),
        }
    }

    /// Fixed handshake response. Never touches the registry; always
    /// succeeds. A client speaking a different protocol version is
    /// accepted with a warning (see DESIGN.md).
    fn initialize(&self, params: Option<Value>) -> Result<Value, DispatchError> {
        if let Some(params) = params {
            match serde_json::from_value::<InitializeRequest>(params) {
                Ok(request) => {
                    if request.protocol_version != self.config.protocol_version {
                        warn!(
                            client_version = %request.protocol_version,
                            server_version = %self.config.protocol_version,
                            client = %request.client_info.name,
                            "protocol version mismatch"
                        );
                    } else {
                        debug!(client = %request.client_info.name, "handshake");
                    }
                }
                Err(err) => debug!(%err, "handshake params not understood"),
            }
        }

        encode(InitializeResult {
            protocol_version: self.config.protocol_version.clone(),
            capabilities: ServerCapabilities::default(),
            server_info: self.config.server_info.clone(),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, DispatchError> {
        let request: CallToolRequest =
            serde_json::from_value(params.unwrap_or(Value::Null)).map_err(|err| {
                DispatchError::InvalidParams {
                    detail: err.to_string(),
                }
            })?;

        let handler = self
            .registry
            .tool(&request.name)
            .ok_or(DispatchError::ToolNotFound { name: request.name })?;

        let text = handler
            .call(request.arguments)
            .await
            .map_err(|source| DispatchError::ToolFailed { source })?;

        encode(CallToolResult::text(text))
    }

    async fn read_resource(&self, params: Option<Value>) -> Result<Value, DispatchError> {
        let request: ReadResourceRequest =
            serde_json::from_value(params.unwrap_or(Value::Null)).map_err(|err| {
                DispatchError::InvalidParams {
                    detail: err.to_string(),
                }
            })?;

        let handler = self
            .registry
            .resource(&request.uri)
            .ok_or(DispatchError::ResourceNotFound {
                uri: request.uri.clone(),
            })?;

        let text = handler
            .read()
            .await
            .map_err(|source| DispatchError::ResourceFailed { source })?;

        encode(ReadResourceResult::text(request.uri, text))
    }
}

fn encode<T: serde::Serialize>(value: T) -> Result<Value, DispatchError> {
    serde_json::to_value(value).map_err(|err| DispatchError::Internal {
        detail: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::handlers::{FunctionResourceHandler, FunctionToolHandler};
    use gridwire_protocol::types::{Resource, RequestId, Tool, ToolInputSchema};
    use serde_json::json;

    fn test_router() -> RequestRouter {
        let registry = Arc::new(HandlerRegistry::new());

        registry.register_tool(FunctionToolHandler::new(
            Tool {
                name: "echo".to_string(),
                description: "Echo the 'text' argument".to_string(),
                input_schema: ToolInputSchema::empty(),
            },
            |args| async move {
                Ok(args
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string())
            },
        ));

        registry.register_tool(FunctionToolHandler::new(
            Tool {
                name: "broken".to_string(),
                description: "Always fails".to_string(),
                input_schema: ToolInputSchema::empty(),
            },
            |_args| async { Err(HandlerError::new("cannot comply")) },
        ));

        registry.register_resource(FunctionResourceHandler::new(
            Resource {
                uri: "state://now".to_string(),
                name: "Now".to_string(),
                description: "Current state".to_string(),
            },
            || async { Ok("ready".to_string()) },
        ));

        RequestRouter::new(registry, ServerConfig::new("test-server", "0.0.0"))
    }

    fn request(method: &str, params: Value, id: &str) -> String {
        json!({"jsonrpc": "2.0", "method": method, "params": params, "id": id}).to_string()
    }

    #[tokio::test]
    async fn malformed_json_yields_parse_error_with_null_id() {
        let router = test_router();
        let response = router.dispatch("this is not json").await;
        assert!(response.id.is_null());
        assert_eq!(response.rpc_error().unwrap().code, -32700);
    }

    #[tokio::test]
    async fn missing_method_is_treated_as_malformed() {
        let router = test_router();
        let response = router.dispatch(r#"{"jsonrpc":"2.0","id":"1"}"#).await;
        assert!(response.id.is_null());
        assert_eq!(response.rpc_error().unwrap().code, -32700);
    }

    #[tokio::test]
    async fn initialize_always_succeeds_and_echoes_id() {
        let router = test_router();
        let params = json!({
            "protocolVersion": "1999-01-01",
            "capabilities": {"roots": {"listChanged": false}},
            "clientInfo": {"name": "test", "version": "0"}
        });
        let response = router.dispatch(&request("initialize", params, "init-1")).await;

        assert_eq!(
            response.id.as_request_id(),
            Some(&RequestId::from("init-1"))
        );
        let result = response.result().unwrap();
        assert_eq!(result["serverInfo"]["name"], "test-server");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn tools_list_returns_descriptors_without_handlers() {
        let router = test_router();
        let response = router.dispatch(&request("tools/list", json!({}), "2")).await;
        let result = response.result().unwrap();

        let names: Vec<&str> = result["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"echo"));
        assert!(names.contains(&"broken"));
        assert!(result["tools"][0].get("handler").is_none());
    }

    #[tokio::test]
    async fn tools_call_wraps_handler_output_as_text_content() {
        let router = test_router();
        let params = json!({"name": "echo", "arguments": {"text": "hello"}});
        let response = router.dispatch(&request("tools/call", params, "3")).await;

        assert_eq!(response.id.as_request_id(), Some(&RequestId::from("3")));
        let result = response.result().unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], "hello");
    }

    #[tokio::test]
    async fn unknown_tool_is_invalid_params() {
        let router = test_router();
        let params = json!({"name": "nope", "arguments": {}});
        let response = router.dispatch(&request("tools/call", params, "4")).await;

        let error = response.rpc_error().unwrap();
        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "Tool not found");
        assert_eq!(response.id.as_request_id(), Some(&RequestId::from("4")));
    }

    #[tokio::test]
    async fn failing_handler_maps_to_internal_error() {
        let router = test_router();
        let params = json!({"name": "broken"});
        let response = router.dispatch(&request("tools/call", params, "5")).await;

        let error = response.rpc_error().unwrap();
        assert_eq!(error.code, -32603);
        assert_eq!(error.message, "Tool execution failed: cannot comply");
    }

    #[tokio::test]
    async fn resources_read_round_trip() {
        let router = test_router();
        let response = router
            .dispatch(&request("resources/read", json!({"uri": "state://now"}), "6"))
            .await;
        let result = response.result().unwrap();
        assert_eq!(result["contents"][0]["uri"], "state://now");
        assert_eq!(result["contents"][0]["text"], "ready");

        let response = router
            .dispatch(&request("resources/read", json!({"uri": "state://gone"}), "7"))
            .await;
        let error = response.rpc_error().unwrap();
        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "Resource not found");
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let router = test_router();
        let response = router.dispatch(&request("tools/destroy", json!({}), "8")).await;
        let error = response.rpc_error().unwrap();
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Method not found");
    }

    #[tokio::test]
    async fn request_without_id_gets_null_id_response() {
        let router = test_router();
        let response = router
            .dispatch(&json!({"jsonrpc": "2.0", "method": "tools/list", "params": {}}).to_string())
            .await;
        assert!(response.id.is_null());
        assert!(response.is_success());
    }
}
