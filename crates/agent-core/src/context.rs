//! Execution context for agents
//!
//! The `Context` struct is a key-value store agents use to receive run
//! settings and to report run statistics back to whoever drives them.

use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Number of model invocations made during the last run
    pub const LLM_CALLS: &str = "llm_calls";
    /// Final status of the last run ("completed" or "iteration_limit_reached")
    pub const RUN_STATUS: &str = "run_status";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use agent_core::Context;
///
/// let mut ctx = Context::new();
/// ctx.set_llm_calls(3);
/// ctx.set_run_status("completed");
///
/// assert_eq!(ctx.llm_calls(), Some(3));
/// assert_eq!(ctx.run_status(), Some("completed"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the number of model calls made by the last run
    pub fn set_llm_calls(&mut self, calls: usize) {
        self.insert(keys::LLM_CALLS, serde_json::json!(calls));
    }

    /// Number of model calls made by the last run, if recorded
    pub fn llm_calls(&self) -> Option<usize> {
        self.get(keys::LLM_CALLS)
            .and_then(serde_json::Value::as_u64)
            .map(|n| n as usize)
    }

    /// Record the final status of the last run
    pub fn set_run_status(&mut self, status: impl Into<String>) {
        self.insert(keys::RUN_STATUS, serde_json::json!(status.into()));
    }

    /// Final status of the last run, if recorded
    pub fn run_status(&self) -> Option<&str> {
        self.get(keys::RUN_STATUS).and_then(|v| v.as_str())
    }

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Get the number of entries in the context
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut ctx = Context::new();
        assert!(ctx.is_empty());

        ctx.insert("model", serde_json::json!("claude-sonnet-4-20250514"));
        assert_eq!(ctx.len(), 1);
        assert_eq!(
            ctx.get("model"),
            Some(&serde_json::json!("claude-sonnet-4-20250514"))
        );
        assert_eq!(ctx.get("missing"), None);
    }

    #[test]
    fn test_run_statistics() {
        let mut ctx = Context::new();
        assert_eq!(ctx.llm_calls(), None);

        ctx.set_llm_calls(4);
        ctx.set_run_status("completed");

        assert_eq!(ctx.llm_calls(), Some(4));
        assert_eq!(ctx.run_status(), Some("completed"));
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_run_statistics_overwrite() {
        let mut ctx = Context::new();
        ctx.set_run_status("completed");
        ctx.set_run_status("iteration_limit_reached");

        assert_eq!(ctx.run_status(), Some("iteration_limit_reached"));
        assert_eq!(ctx.len(), 1);
    }
}
