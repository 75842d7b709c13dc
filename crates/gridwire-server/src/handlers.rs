//! Handler traits and closure adapters
//!
//! A tool handler is an async callable taking named arguments and
//! returning text; a resource handler is an async zero-argument callable
//! returning text. Both return `Result<String, HandlerError>` — an `Err`
//! means the handler itself failed (wire code `-32603`), while a
//! business-level rejection is an `Ok` whose text says so. The dispatcher
//! never sees application state; handlers capture it at registration.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use gridwire_protocol::types::{Resource, Tool};

use crate::error::HandlerError;

/// Arguments to a tool invocation, bound by parameter name.
pub type ToolArguments = Map<String, Value>;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type ToolFn = Arc<dyn Fn(ToolArguments) -> BoxFuture<Result<String, HandlerError>> + Send + Sync>;
type ResourceFn = Arc<dyn Fn() -> BoxFuture<Result<String, HandlerError>> + Send + Sync>;

/// A named, invocable, side-effecting operation.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Invoke the tool with arguments bound by name.
    async fn call(&self, arguments: ToolArguments) -> Result<String, HandlerError>;

    /// The externally visible tool descriptor.
    fn tool(&self) -> Tool;
}

/// A named, read-only data source addressed by URI.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Read the resource.
    async fn read(&self) -> Result<String, HandlerError>;

    /// The externally visible resource descriptor.
    fn resource(&self) -> Resource;
}

/// Tool handler built from an async closure.
pub struct FunctionToolHandler {
    tool: Tool,
    handler: ToolFn,
}

impl std::fmt::Debug for FunctionToolHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionToolHandler")
            .field("tool", &self.tool.name)
            .finish()
    }
}

impl FunctionToolHandler {
    /// Wrap an async closure as a tool handler.
    pub fn new<F, Fut>(tool: Tool, handler: F) -> Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, HandlerError>> + Send + 'static,
    {
        let handler: ToolFn =
            Arc::new(move |args| Box::pin(handler(args)) as BoxFuture<Result<String, HandlerError>>);
        Self { tool, handler }
    }
}

#[async_trait]
impl ToolHandler for FunctionToolHandler {
    async fn call(&self, arguments: ToolArguments) -> Result<String, HandlerError> {
        (self.handler)(arguments).await
    }

    fn tool(&self) -> Tool {
        self.tool.clone()
    }
}

/// Resource handler built from an async closure.
pub struct FunctionResourceHandler {
    resource: Resource,
    handler: ResourceFn,
}

impl std::fmt::Debug for FunctionResourceHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionResourceHandler")
            .field("resource", &self.resource.uri)
            .finish()
    }
}

impl FunctionResourceHandler {
    /// Wrap an async closure as a resource handler.
    pub fn new<F, Fut>(resource: Resource, handler: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, HandlerError>> + Send + 'static,
    {
        let handler: ResourceFn =
            Arc::new(move || Box::pin(handler()) as BoxFuture<Result<String, HandlerError>>);
        Self { resource, handler }
    }
}

#[async_trait]
impl ResourceHandler for FunctionResourceHandler {
    async fn read(&self) -> Result<String, HandlerError> {
        (self.handler)().await
    }

    fn resource(&self) -> Resource {
        self.resource.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwire_protocol::types::ToolInputSchema;
    use serde_json::json;

    fn echo_tool() -> FunctionToolHandler {
        FunctionToolHandler::new(
            Tool {
                name: "echo".to_string(),
                description: "Echo the 'text' argument".to_string(),
                input_schema: ToolInputSchema::empty(),
            },
            |args| async move {
                args.get("text")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| HandlerError::new("missing 'text'"))
            },
        )
    }

    #[tokio::test]
    async fn function_tool_invokes_closure() {
        let handler = echo_tool();
        let mut args = ToolArguments::new();
        args.insert("text".to_string(), json!("hi"));
        assert_eq!(handler.call(args).await.unwrap(), "hi");
        assert_eq!(handler.tool().name, "echo");
    }

    #[tokio::test]
    async fn function_tool_surfaces_handler_error() {
        let handler = echo_tool();
        let err = handler.call(ToolArguments::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "missing 'text'");
    }

    #[tokio::test]
    async fn function_resource_invokes_closure() {
        let handler = FunctionResourceHandler::new(
            Resource {
                uri: "state://now".to_string(),
                name: "Now".to_string(),
                description: "Current state".to_string(),
            },
            || async { Ok("ready".to_string()) },
        );
        assert_eq!(handler.read().await.unwrap(), "ready");
        assert_eq!(handler.resource().uri, "state://now");
    }
}
