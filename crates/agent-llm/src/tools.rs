//! Tool definition types for LLM tool use

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition for LLM provider
///
/// This describes a tool that the LLM can use, including its name,
/// description, and input schema in JSON Schema format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match the tool in ToolRegistry)
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON schema for the tool's input parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Helper module to build JSON schemas for tools
pub mod schema {
    use serde_json::{json, Value};

    /// Create a JSON schema for an object with properties
    ///
    /// # Example
    ///
    /// ```
    /// use agent_llm::tools::schema;
    /// use serde_json::json;
    ///
    /// let schema = schema::object(
    ///     json!({
    ///         "a": schema::integer("First int"),
    ///         "b": schema::integer("Second int"),
    ///     }),
    ///     vec!["a", "b"],
    /// );
    /// ```
    pub fn object(properties: Value, required: Vec<&str>) -> Value {
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// String property schema
    ///
    /// # Example
    ///
    /// ```
    /// use agent_llm::tools::schema;
    ///
    /// let schema = schema::string("A text description");
    /// ```
    pub fn string(description: &str) -> Value {
        json!({
            "type": "string",
            "description": description,
        })
    }

    /// Integer property schema
    pub fn integer(description: &str) -> Value {
        json!({
            "type": "integer",
            "description": description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_definition_creation() {
        let schema = schema::object(
            json!({
                "path": schema::string("Test path relative to the checkout"),
            }),
            vec!["path"],
        );

        let tool = ToolDefinition::new("run_tests", "Run the test suite", schema.clone());
        assert_eq!(tool.name, "run_tests");
        assert_eq!(tool.description, "Run the test suite");
        assert_eq!(tool.input_schema, schema);
        assert_eq!(tool.input_schema["required"][0], "path");
    }

    #[test]
    fn test_schema_builders() {
        let str_schema = schema::string("test");
        assert_eq!(str_schema["type"], "string");

        let int_schema = schema::integer("First int");
        assert_eq!(int_schema["type"], "integer");
    }
}
