//! Tool and resource registry
//!
//! Maps tool names and resource URIs to their handlers. Registration is
//! insert-or-replace; there is no removal. Lookups return `Option` so the
//! dispatcher can turn absence into the right protocol error instead of
//! catching anything. Listings expose metadata only — handlers never
//! leave this module.

use std::sync::Arc;

use dashmap::DashMap;

use gridwire_protocol::types::{Resource, Tool};

use crate::handlers::{ResourceHandler, ToolHandler};

/// Registry of named tool and resource handlers.
///
/// Read-mostly after construction; the concurrent maps make registration
/// and lookup safe from any task without further locking.
#[derive(Default)]
pub struct HandlerRegistry {
    tools: DashMap<String, Arc<dyn ToolHandler>>,
    resources: DashMap<String, Arc<dyn ResourceHandler>>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("tools", &self.tools.len())
            .field("resources", &self.resources.len())
            .finish()
    }
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool handler, keyed by its declared name.
    ///
    /// Registering a second handler under the same name replaces the
    /// first.
    pub fn register_tool<H>(&self, handler: H)
    where
        H: ToolHandler + 'static,
    {
        let name = handler.tool().name;
        self.tools.insert(name, Arc::new(handler));
    }

    /// Register a resource handler, keyed by its declared URI.
    pub fn register_resource<H>(&self, handler: H)
    where
        H: ResourceHandler + 'static,
    {
        let uri = handler.resource().uri;
        self.resources.insert(uri, Arc::new(handler));
    }

    /// Look up a tool handler by name.
    pub fn tool(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Look up a resource handler by URI.
    pub fn resource(&self, uri: &str) -> Option<Arc<dyn ResourceHandler>> {
        self.resources
            .get(uri)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Externally visible tool descriptors.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|entry| entry.value().tool()).collect()
    }

    /// Externally visible resource descriptors.
    pub fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .iter()
            .map(|entry| entry.value().resource())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{FunctionResourceHandler, FunctionToolHandler};
    use gridwire_protocol::types::ToolInputSchema;

    fn tool_named(name: &str, reply: &'static str) -> FunctionToolHandler {
        FunctionToolHandler::new(
            Tool {
                name: name.to_string(),
                description: format!("replies {reply}"),
                input_schema: ToolInputSchema::empty(),
            },
            move |_args| async move { Ok(reply.to_string()) },
        )
    }

    #[tokio::test]
    async fn register_and_look_up_tool() {
        let registry = HandlerRegistry::new();
        registry.register_tool(tool_named("greet", "hello"));

        let handler = registry.tool("greet").expect("registered");
        assert_eq!(handler.call(Default::default()).await.unwrap(), "hello");
        assert!(registry.tool("missing").is_none());
    }

    #[tokio::test]
    async fn registration_replaces_by_key() {
        let registry = HandlerRegistry::new();
        registry.register_tool(tool_named("greet", "first"));
        registry.register_tool(tool_named("greet", "second"));

        assert_eq!(registry.list_tools().len(), 1);
        let handler = registry.tool("greet").expect("registered");
        assert_eq!(handler.call(Default::default()).await.unwrap(), "second");
    }

    #[test]
    fn listings_carry_metadata_only() {
        let registry = HandlerRegistry::new();
        registry.register_tool(tool_named("greet", "hello"));
        registry.register_resource(FunctionResourceHandler::new(
            Resource {
                uri: "state://now".to_string(),
                name: "Now".to_string(),
                description: "Current state".to_string(),
            },
            || async { Ok(String::new()) },
        ));

        let tools = registry.list_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "greet");

        let resources = registry.list_resources();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].uri, "state://now");
    }
}
