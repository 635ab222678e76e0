//! The test-runner agent

use agent_core::{Agent, Context, Result};
use agent_llm::{LLMProvider, Message};
use agent_runtime::{AgentExecutor, ExecutorEventHandler, RunOutcome, ToolAgent, record_outcome};
use agent_utils::AgentConfig;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::tools::{TestEnvironment, test_runner_registry};

/// System prompt sent with every model call
pub const SYSTEM_PROMPT: &str = "You are a test-running assistant. You have a sandboxed container \
     with two tools: `setup_workflow` prepares the repository and its dependencies, and \
     `run_tests` runs the test suite for a path inside the repository. Set up the environment \
     before running tests. When you are done, summarize how many tests passed and failed and \
     explain any failures.";

/// Message used when the agent is started without a conversation
pub const DEFAULT_INSTRUCTION: &str =
    "Set up the test environment, run the tests, and summarize the results.";

/// Agent that prepares a sandbox, runs tests and summarizes them
pub struct TestRunnerAgent {
    inner: ToolAgent,
}

impl TestRunnerAgent {
    /// Name reported through the `Agent` trait
    pub const NAME: &'static str = "Test Runner Agent";

    /// Create the agent on top of `provider` and `env`
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        env: Arc<TestEnvironment>,
        config: &AgentConfig,
    ) -> Result<Self> {
        Self::with_event_handler(provider, env, config, None)
    }

    /// Like [`TestRunnerAgent::new`], reporting loop events to `handler`
    pub fn with_event_handler(
        provider: Arc<dyn LLMProvider>,
        env: Arc<TestEnvironment>,
        config: &AgentConfig,
        handler: Option<Arc<dyn ExecutorEventHandler>>,
    ) -> Result<Self> {
        let mut builder = AgentExecutor::builder()
            .provider(provider)
            .tool_registry(Arc::new(test_runner_registry(env)?))
            .model(&config.model)
            .system_prompt(SYSTEM_PROMPT)
            .max_tokens(config.max_tokens)
            .temperature(config.temperature)
            .max_iterations(config.max_iterations);
        if let Some(handler) = handler {
            builder = builder.event_handler(handler);
        }

        Ok(Self {
            inner: ToolAgent::from_parts(builder.build()?, Self::NAME),
        })
    }

    /// Respond to a conversation
    ///
    /// An empty conversation starts with [`DEFAULT_INSTRUCTION`].
    pub async fn respond(&self, conversation: Vec<Message>) -> Result<RunOutcome> {
        let conversation = if conversation.is_empty() {
            info!("No conversation given, using default instruction");
            vec![Message::user(DEFAULT_INSTRUCTION)]
        } else {
            conversation
        };

        self.inner.respond(conversation).await
    }
}

#[async_trait]
impl Agent for TestRunnerAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        let conversation = if input.trim().is_empty() {
            Vec::new()
        } else {
            vec![Message::user(input)]
        };

        let outcome = self.respond(conversation).await?;
        record_outcome(context, &outcome);
        Ok(outcome.final_text())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}
