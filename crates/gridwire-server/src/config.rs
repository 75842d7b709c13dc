//! Server configuration

use gridwire_protocol::types::{Implementation, PROTOCOL_VERSION};

/// Identity and protocol version the server advertises in the
/// `initialize` handshake.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server identity returned as `serverInfo`
    pub server_info: Implementation,
    /// Protocol version returned as `protocolVersion`
    pub protocol_version: String,
}

impl ServerConfig {
    /// Config with an explicit server name and version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            server_info: Implementation::new(name, version),
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_info: Implementation::new("gridwire-server", env!("CARGO_PKG_VERSION")),
            protocol_version: PROTOCOL_VERSION.to_string(),
        }
    }
}
