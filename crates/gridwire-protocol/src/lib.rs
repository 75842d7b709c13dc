//! # Gridwire Protocol
//!
//! Wire-format layer for the Gridwire protocol: a JSON-RPC 2.0 envelope
//! carried over a persistent, message-framed connection, plus the typed
//! payloads for the five methods the protocol speaks (`initialize`,
//! `tools/list`, `tools/call`, `resources/list`, `resources/read`).
//!
//! This crate is pure data — no I/O, no async. The server and client
//! crates share it so both ends agree on exactly one serialization of
//! every message.

pub mod jsonrpc;
pub mod types;

pub use jsonrpc::{
    JsonRpcError, JsonRpcErrorCode, JsonRpcRequest, JsonRpcResponse, JsonRpcResponsePayload,
    JsonRpcVersion, ResponseId,
};
pub use types::{
    CallToolRequest, CallToolResult, ClientCapabilities, Content, Implementation,
    InitializeRequest, InitializeResult, ListResourcesResult, ListToolsResult,
    ReadResourceRequest, ReadResourceResult, RequestId, Resource, ResourceContents,
    ResourcesCapability, RootsCapability, ServerCapabilities, Tool, ToolInputSchema,
    ToolsCapability, PROTOCOL_VERSION,
};
