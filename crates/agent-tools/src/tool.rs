//! The `Tool` trait

use agent_core::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A named function the model may request
///
/// The model sees `name`, `description` and `input_schema`; it answers with an
/// argument object that is handed to `execute` as-is.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Run the function on `params`
    ///
    /// An `Err` is reported back to the model as an error tool result; it
    /// never aborts the agent loop.
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Name the model uses in its requests; unique within a registry
    fn name(&self) -> &str;

    /// What the function does, for the model
    fn description(&self) -> &str;

    /// JSON Schema of the argument object
    ///
    /// ```
    /// use serde_json::json;
    ///
    /// // Two integer operands:
    /// let schema = json!({
    ///     "type": "object",
    ///     "properties": {
    ///         "a": { "type": "integer", "description": "First int" },
    ///         "b": { "type": "integer", "description": "Second int" }
    ///     },
    ///     "required": ["a", "b"]
    /// });
    /// ```
    fn input_schema(&self) -> Value;
}
