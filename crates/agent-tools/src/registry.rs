//! Tool registry for managing available tools
//!
//! A registry is assembled once through [`ToolRegistryBuilder`] and is
//! read-only afterwards, so the set of callable functions cannot change
//! while an agent loop is running.

use crate::Tool;
use agent_core::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Fixed mapping from tool name to implementation
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a registry
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.by_name.get(name).map(|&idx| self.tools[idx].clone())
    }

    /// Check whether a tool is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// List all registered tools in registration order
    ///
    /// This is used to build the tool definitions sent to the LLM, so the
    /// order is stable from one request to the next.
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.clone()
    }

    /// Names of all registered tools in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

/// Builder for [`ToolRegistry`]
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistryBuilder {
    /// Add a tool
    pub fn register(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Add several tools
    pub fn register_all(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Build the registry, rejecting duplicate or empty names
    pub fn build(self) -> Result<ToolRegistry> {
        let mut by_name = HashMap::with_capacity(self.tools.len());

        for (idx, tool) in self.tools.iter().enumerate() {
            let name = tool.name();
            if name.is_empty() {
                return Err(Error::InitializationFailed(
                    "tool name must not be empty".to_string(),
                ));
            }
            if by_name.insert(name.to_string(), idx).is_some() {
                return Err(Error::InitializationFailed(format!(
                    "duplicate tool name: {name}"
                )));
            }
        }

        Ok(ToolRegistry {
            tools: self.tools,
            by_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct Echo(&'static str);

    #[async_trait]
    impl Tool for Echo {
        async fn execute(&self, params: Value) -> Result<Value> {
            Ok(params)
        }

        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Echo the input back"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object"})
        }
    }

    #[test]
    fn test_lookup_and_order() {
        let registry = ToolRegistry::builder()
            .register(Arc::new(Echo("add")))
            .register(Arc::new(Echo("multiply")))
            .register(Arc::new(Echo("divide")))
            .build()
            .unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["add", "multiply", "divide"]);
        assert!(registry.contains("multiply"));
        assert!(registry.get("subtract").is_none());
        assert_eq!(registry.get("divide").unwrap().name(), "divide");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = ToolRegistry::builder()
            .register_all([
                Arc::new(Echo("add")) as Arc<dyn Tool>,
                Arc::new(Echo("add")) as Arc<dyn Tool>,
            ])
            .build()
            .unwrap_err();

        assert!(err.to_string().contains("duplicate tool name: add"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = ToolRegistry::builder().register(Arc::new(Echo(""))).build();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_registered_tool_executes() {
        let registry = ToolRegistry::builder()
            .register(Arc::new(Echo("echo")))
            .build()
            .unwrap();

        let tool = registry.get("echo").unwrap();
        let out = tool.execute(json!({"a": 1})).await.unwrap();
        assert_eq!(out, json!({"a": 1}));
    }
}
