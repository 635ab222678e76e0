//! Tool agent implementation (wraps AgentExecutor)

use crate::executor::{AgentExecutor, RunOutcome};
use agent_core::{Agent, Context, Result};
use agent_llm::Message;
use async_trait::async_trait;

/// An agent that uses the LLM loop with tool execution
///
/// ToolAgent wraps the AgentExecutor to provide the Agent trait interface.
/// Each run is capped at the executor's configured `max_iterations`, and the
/// number of model calls and the final status are written to the context.
///
/// # Example
///
/// ```no_run
/// use agent_runtime::{AgentExecutor, ToolAgent};
/// use agent_core::{Agent, Context};
///
/// # async fn example(executor: AgentExecutor) -> agent_core::Result<()> {
/// let agent = ToolAgent::from_parts(executor, "calculator");
///
/// let mut context = Context::new();
/// let response = agent.process("What is 3 times 4?".to_string(), &mut context).await?;
/// println!("{response} ({:?} model calls)", context.llm_calls());
/// # Ok(())
/// # }
/// ```
pub struct ToolAgent {
    executor: AgentExecutor,
    name: String,
}

impl ToolAgent {
    /// Create a new tool agent
    pub fn new(executor: AgentExecutor, name: String) -> Self {
        Self { executor, name }
    }

    /// Create a tool agent from parts
    ///
    /// Convenience method that accepts any string-like type for the name.
    pub fn from_parts(executor: AgentExecutor, name: impl Into<String>) -> Self {
        Self {
            executor,
            name: name.into(),
        }
    }

    /// Get a reference to the underlying executor
    pub fn executor(&self) -> &AgentExecutor {
        &self.executor
    }

    /// Run the loop over a full conversation with the configured cap
    pub async fn respond(&self, conversation: Vec<Message>) -> Result<RunOutcome> {
        self.executor
            .run_conversation(conversation, self.executor.config().max_iterations)
            .await
    }
}

/// Copy run statistics into the caller's context
pub fn record_outcome(context: &mut Context, outcome: &RunOutcome) {
    context.set_llm_calls(outcome.llm_calls);
    context.set_run_status(outcome.status.as_str());
}

#[async_trait]
impl Agent for ToolAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        let outcome = self.respond(vec![Message::user(input)]).await?;
        record_outcome(context, &outcome);
        Ok(outcome.final_text())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
