//! Shared protocol data types
//!
//! Typed request/result payloads for every method the protocol carries,
//! plus the request identifier and the capability/identity structures
//! exchanged during the `initialize` handshake.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Protocol version advertised during the handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Method name constants.
///
/// The dispatcher routes on these; keeping them here means the client and
/// server can never drift on spelling.
pub mod methods {
    /// Connection handshake; must complete before any other call.
    pub const INITIALIZE: &str = "initialize";
    /// List registered tools (metadata only).
    pub const TOOLS_LIST: &str = "tools/list";
    /// Invoke a registered tool by name.
    pub const TOOLS_CALL: &str = "tools/call";
    /// List registered resources (metadata only).
    pub const RESOURCES_LIST: &str = "resources/list";
    /// Read a registered resource by URI.
    pub const RESOURCES_READ: &str = "resources/read";
}

/// Request identifier: a JSON string or integer.
///
/// The Gridwire client always issues stringified integers, but the server
/// echoes whatever form the request carried, so both are representable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// String identifier
    String(String),
    /// Integer identifier
    Integer(i64),
}

impl RequestId {
    /// Wire form of the identifier, used as the correlation key.
    pub fn as_key(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

/// Name/version pair identifying one end of the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Implementation {
    /// Implementation name
    pub name: String,
    /// Implementation version
    pub version: String,
}

impl Implementation {
    /// Create a new implementation descriptor.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Tools capability flags advertised by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// Whether the server emits list-changed notifications (it does not).
    pub list_changed: bool,
}

/// Resources capability flags advertised by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesCapability {
    /// Whether the server emits list-changed notifications (it does not).
    pub list_changed: bool,
}

/// Roots capability flags advertised by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootsCapability {
    /// Whether the client emits list-changed notifications.
    pub list_changed: bool,
}

/// Capability flags declared by the server in the handshake response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities
    pub tools: ToolsCapability,
    /// Resource-related capabilities
    pub resources: ResourcesCapability,
}

/// Capability flags declared by the client in the handshake request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCapabilities {
    /// Roots capability, if the client supports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roots: Option<RootsCapability>,
}

/// `initialize` request parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeRequest {
    /// Protocol version the client speaks
    pub protocol_version: String,
    /// Client capability flags
    #[serde(default)]
    pub capabilities: ClientCapabilities,
    /// Client identity
    pub client_info: Implementation,
}

/// `initialize` response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Protocol version the server speaks
    pub protocol_version: String,
    /// Server capability flags
    pub capabilities: ServerCapabilities,
    /// Server identity
    pub server_info: Implementation,
}

/// Input schema for a tool: an object schema with named properties.
///
/// Declarative metadata only — the dispatcher never validates arguments
/// against it; it exists so `tools/list` can describe each tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInputSchema {
    /// Schema type, always `"object"`
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Parameter name to JSON-schema fragment
    pub properties: Map<String, Value>,
}

impl ToolInputSchema {
    /// Build an object schema from a property map.
    pub fn object(properties: Map<String, Value>) -> Self {
        Self {
            schema_type: "object".to_string(),
            properties,
        }
    }

    /// Schema for a tool that takes no arguments.
    pub fn empty() -> Self {
        Self::object(Map::new())
    }
}

/// Externally visible description of a registered tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Unique tool name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Declared input schema
    pub input_schema: ToolInputSchema,
}

/// `tools/list` response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    /// Registered tools, metadata only
    pub tools: Vec<Tool>,
}

/// `tools/call` request parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolRequest {
    /// Name of the tool to invoke
    pub name: String,
    /// Arguments bound by parameter name; defaults to empty
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub arguments: Map<String, Value>,
}

/// One piece of content in a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Plain text content
    Text {
        /// The text payload
        text: String,
    },
}

impl Content {
    /// Create a text content item.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The text payload, if this is text content.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
        }
    }
}

/// `tools/call` response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolResult {
    /// Content items produced by the tool
    pub content: Vec<Content>,
}

impl CallToolResult {
    /// Wrap a tool's stringified output as a single text content item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
        }
    }
}

/// Externally visible description of a registered resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource URI
    pub uri: String,
    /// Human-readable name
    pub name: String,
    /// Human-readable description
    pub description: String,
}

/// `resources/list` response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResourcesResult {
    /// Registered resources, metadata only
    pub resources: Vec<Resource>,
}

/// `resources/read` request parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResourceRequest {
    /// URI of the resource to read
    pub uri: String,
}

/// One piece of content in a resource read result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceContents {
    /// URI the content was read from
    pub uri: String,
    /// The text payload
    pub text: String,
}

/// `resources/read` response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResourceResult {
    /// Content items read from the resource
    pub contents: Vec<ResourceContents>,
}

impl ReadResourceResult {
    /// Wrap a resource's stringified output as a single contents item.
    pub fn text(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            contents: vec![ResourceContents {
                uri: uri.into(),
                text: text.into(),
            }],
        }
    }
}
