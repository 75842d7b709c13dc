//! Client error types

use std::time::Duration;

use thiserror::Error;

/// Failure surfaced by the client.
///
/// Request-scoped failures arrive as [`ClientError::Rpc`] (the server
/// answered with an error object) or [`ClientError::Timeout`]; callers
/// never see a raw transport exception for those. Transport-scoped
/// failures end the connection and reject everything outstanding with
/// [`ClientError::ConnectionClosed`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Opening the websocket failed.
    #[error("connect failed: {0}")]
    Connect(String),

    /// The connection opened but the `initialize` handshake failed.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// Writing to the transport failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// A request or response could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server answered this request with an error object.
    #[error("server error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i32,
        /// JSON-RPC error message
        message: String,
    },

    /// No response with this request's id arrived in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The connection went away while this request was outstanding.
    #[error("connection closed")]
    ConnectionClosed,
}

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
