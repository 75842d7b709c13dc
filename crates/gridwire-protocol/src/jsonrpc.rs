//! JSON-RPC 2.0 envelope
//!
//! Request, response, and error objects as they appear on the wire. A
//! response holds either a result or an error, never both — the payload
//! enum makes the invalid state unrepresentable rather than checked.
//!
//! The strict types here assume well-formed traffic; the [`wire`] module
//! has a lenient request form for the socket boundary, where the whole
//! point is classifying input that may not be well-formed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::types::RequestId;

/// JSON-RPC version constant.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC version marker, serialized as the literal `"2.0"`.
///
/// Deserialization rejects any other value, so a strict parse of an
/// envelope with the wrong version fails instead of passing it along.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonRpcVersion;

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(JSONRPC_VERSION)
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let version = String::deserialize(deserializer)?;
        if version == JSONRPC_VERSION {
            Ok(JsonRpcVersion)
        } else {
            Err(serde::de::Error::custom(format!(
                "invalid JSON-RPC version: expected '{JSONRPC_VERSION}', got '{version}'"
            )))
        }
    }
}

/// JSON-RPC request message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version
    pub jsonrpc: JsonRpcVersion,
    /// Request method name
    pub method: String,
    /// Request parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Request identifier
    pub id: RequestId,
}

impl JsonRpcRequest {
    /// Create a new request.
    pub fn new(method: impl Into<String>, params: Option<Value>, id: RequestId) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            method: method.into(),
            params,
            id,
        }
    }
}

/// Response payload: exactly one of result or error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcResponsePayload {
    /// Successful response
    Success {
        /// Response result
        result: Value,
    },
    /// Error response
    Error {
        /// Response error
        error: JsonRpcError,
    },
}

/// Response identifier: the originating request's id, or `null` for
/// failures that happen before an id could be determined (parse errors).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseId(pub Option<RequestId>);

impl ResponseId {
    /// Response id echoing a request id.
    pub fn from_request(id: RequestId) -> Self {
        Self(Some(id))
    }

    /// The `null` id used for pre-dispatch failures.
    pub fn null() -> Self {
        Self(None)
    }

    /// The request id, if present.
    pub fn as_request_id(&self) -> Option<&RequestId> {
        self.0.as_ref()
    }

    /// Whether this is the `null` id.
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

/// JSON-RPC response message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version
    pub jsonrpc: JsonRpcVersion,
    /// Result or error, never both
    #[serde(flatten)]
    pub payload: JsonRpcResponsePayload,
    /// Originating request id, or null
    pub id: ResponseId,
}

impl JsonRpcResponse {
    /// Create a successful response.
    pub fn success(result: Value, id: RequestId) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            payload: JsonRpcResponsePayload::Success { result },
            id: ResponseId::from_request(id),
        }
    }

    /// Create an error response.
    pub fn error(error: JsonRpcError, id: ResponseId) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            payload: JsonRpcResponsePayload::Error { error },
            id,
        }
    }

    /// Create a parse-error response (`-32700`, null id).
    pub fn parse_error() -> Self {
        Self::error(JsonRpcError::parse_error(), ResponseId::null())
    }

    /// Whether this is a successful response.
    pub fn is_success(&self) -> bool {
        matches!(self.payload, JsonRpcResponsePayload::Success { .. })
    }

    /// The result, if this is a successful response.
    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            JsonRpcResponsePayload::Success { result } => Some(result),
            JsonRpcResponsePayload::Error { .. } => None,
        }
    }

    /// The error, if this is an error response.
    pub fn rpc_error(&self) -> Option<&JsonRpcError> {
        match &self.payload {
            JsonRpcResponsePayload::Success { .. } => None,
            JsonRpcResponsePayload::Error { error } => Some(error),
        }
    }
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} ({code})")]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create a new error.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Parse error (`-32700`).
    pub fn parse_error() -> Self {
        Self::new(JsonRpcErrorCode::ParseError.code(), "Parse error")
    }

    /// Method not found (`-32601`).
    pub fn method_not_found() -> Self {
        Self::new(JsonRpcErrorCode::MethodNotFound.code(), "Method not found")
    }

    /// Invalid params (`-32602`) with a fixed message.
    ///
    /// Also used for unknown tool/resource lookups, which carry their own
    /// message text ("Tool not found" / "Resource not found").
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidParams.code(), message)
    }

    /// Internal or handler error (`-32603`).
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(JsonRpcErrorCode::InternalError.code(), message)
    }
}

/// Standard JSON-RPC error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    /// Parse error (-32700)
    ParseError,
    /// Invalid request (-32600)
    InvalidRequest,
    /// Method not found (-32601)
    MethodNotFound,
    /// Invalid params / unknown tool or resource (-32602)
    InvalidParams,
    /// Internal or handler error (-32603)
    InternalError,
    /// Application-defined error
    ApplicationError(i32),
}

impl JsonRpcErrorCode {
    /// Numeric error code.
    pub fn code(&self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::ApplicationError(code) => *code,
        }
    }
}

impl From<i32> for JsonRpcErrorCode {
    fn from(code: i32) -> Self {
        match code {
            -32700 => Self::ParseError,
            -32600 => Self::InvalidRequest,
            -32601 => Self::MethodNotFound,
            -32602 => Self::InvalidParams,
            -32603 => Self::InternalError,
            other => Self::ApplicationError(other),
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Lenient envelope forms for the socket boundary.
///
/// Inbound frames may be arbitrary text. These types accept any `jsonrpc`
/// string, any JSON `id`, and a missing `method`, so the dispatcher can
/// decide how to answer (and with which id) instead of losing that
/// information to a strict parse failure.
pub mod wire {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    use crate::types::RequestId;

    /// Lenient inbound request.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct IncomingRequest {
        /// Version string as sent; not validated here
        #[serde(default)]
        pub jsonrpc: Option<String>,
        /// Request id: string, number, or absent
        #[serde(default)]
        pub id: Option<Value>,
        /// Method name, possibly absent (which makes the envelope invalid)
        #[serde(default)]
        pub method: Option<String>,
        /// Raw parameters
        #[serde(default)]
        pub params: Option<Value>,
    }

    impl IncomingRequest {
        /// Parse one inbound text frame.
        pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
            serde_json::from_str(text)
        }

        /// The request id in canonical form, if one was sent and it is a
        /// string or integer. Anything else is treated as absent.
        pub fn request_id(&self) -> Option<RequestId> {
            match self.id.as_ref()? {
                Value::String(s) => Some(RequestId::String(s.clone())),
                Value::Number(n) => n.as_i64().map(RequestId::Integer),
                _ => None,
            }
        }
    }
}
