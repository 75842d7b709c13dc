//! Server error types
//!
//! Three layers, kept distinct on purpose: [`HandlerError`] is what a
//! registered handler returns when it fails (business rejections are not
//! errors — they are successful returns whose text says so),
//! [`DispatchError`] is a request-scoped failure the dispatcher maps to a
//! JSON-RPC error object, and [`ServerError`] covers the listener
//! lifecycle (bind/accept), which is not tied to any request.

use gridwire_protocol::jsonrpc::JsonRpcError;
use thiserror::Error;

/// Failure raised by a registered tool or resource handler.
///
/// Reaching the wire as a `-32603` error; the message becomes the
/// `<cause>` part of "Tool execution failed: <cause>".
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HandlerError(String);

impl HandlerError {
    /// Create a handler error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self(err.to_string())
    }
}

/// Request-scoped dispatch failure.
///
/// Every variant maps to exactly one JSON-RPC error code; the mapping in
/// [`DispatchError::to_json_rpc`] is the single place wire codes and
/// messages are decided.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// `tools/call` named a tool that is not registered.
    #[error("tool not found: {name}")]
    ToolNotFound {
        /// Requested tool name
        name: String,
    },

    /// `resources/read` named a URI that is not registered.
    #[error("resource not found: {uri}")]
    ResourceNotFound {
        /// Requested resource URI
        uri: String,
    },

    /// The method is not part of the protocol.
    #[error("method not found: {method}")]
    MethodNotFound {
        /// Requested method name
        method: String,
    },

    /// Params were missing or had the wrong shape.
    #[error("invalid params: {detail}")]
    InvalidParams {
        /// What was wrong
        detail: String,
    },

    /// A tool handler failed.
    #[error("tool execution failed: {source}")]
    ToolFailed {
        /// The handler's failure
        #[source]
        source: HandlerError,
    },

    /// A resource handler failed.
    #[error("resource read failed: {source}")]
    ResourceFailed {
        /// The handler's failure
        #[source]
        source: HandlerError,
    },

    /// Anything not already converted to a typed error.
    #[error("internal error: {detail}")]
    Internal {
        /// What went wrong
        detail: String,
    },
}

impl DispatchError {
    /// The wire-format error object for this failure.
    pub fn to_json_rpc(&self) -> JsonRpcError {
        match self {
            Self::ToolNotFound { .. } => JsonRpcError::invalid_params("Tool not found"),
            Self::ResourceNotFound { .. } => JsonRpcError::invalid_params("Resource not found"),
            Self::MethodNotFound { .. } => JsonRpcError::method_not_found(),
            Self::InvalidParams { detail } => {
                JsonRpcError::invalid_params(format!("Invalid params: {detail}"))
            }
            Self::ToolFailed { source } => {
                JsonRpcError::internal(format!("Tool execution failed: {source}"))
            }
            Self::ResourceFailed { source } => {
                JsonRpcError::internal(format!("Resource read failed: {source}"))
            }
            Self::Internal { detail } => JsonRpcError::internal(format!("Internal error: {detail}")),
        }
    }
}

/// Listener lifecycle failure, not tied to any request.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or serving the listener socket failed.
    #[error("listener I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for listener operations.
pub type ServerResult<T> = Result<T, ServerError>;
