//! The calculator agent

use agent_core::{Agent, Context, Result};
use agent_llm::{LLMProvider, Message};
use agent_runtime::{AgentExecutor, ExecutorEventHandler, RunOutcome, ToolAgent, record_outcome};
use agent_utils::AgentConfig;
use async_trait::async_trait;
use std::sync::Arc;

use crate::tools::calculator_registry_all;

/// System prompt sent with every model call
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant tasked with performing arithmetic on a set of inputs.";

/// Agent that answers arithmetic questions with `add`, `multiply` and `divide`
pub struct CalculatorAgent {
    inner: ToolAgent,
}

impl CalculatorAgent {
    /// Name reported through the `Agent` trait
    pub const NAME: &'static str = "Calculator Agent";

    /// Create the agent on top of `provider`
    pub fn new(provider: Arc<dyn LLMProvider>, config: &AgentConfig) -> Result<Self> {
        Self::with_event_handler(provider, config, None)
    }

    /// Like [`CalculatorAgent::new`], reporting loop events to `handler`
    pub fn with_event_handler(
        provider: Arc<dyn LLMProvider>,
        config: &AgentConfig,
        handler: Option<Arc<dyn ExecutorEventHandler>>,
    ) -> Result<Self> {
        let mut builder = AgentExecutor::builder()
            .provider(provider)
            .tool_registry(Arc::new(calculator_registry_all()?))
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
    /// Returns the whole transcript; its last message is the model's answer
    /// unless the run hit the iteration cap.
    pub async fn respond(&self, conversation: Vec<Message>) -> Result<RunOutcome> {
        self.inner.respond(conversation).await
    }

    /// The underlying tool agent
    pub fn tool_agent(&self) -> &ToolAgent {
        &self.inner
    }
}

#[async_trait]
impl Agent for CalculatorAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        let outcome = self.respond(vec![Message::user(input)]).await?;
        record_outcome(context, &outcome);
        Ok(outcome.final_text())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_llm::ContentBlock;
    use agent_llm::providers::ScriptedProvider;
    use agent_runtime::RunStatus;
    use serde_json::json;

    fn call(id: &str, name: &str, a: i64, b: i64) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input: json!({"a": a, "b": b}),
        }
    }

    #[tokio::test]
    async fn test_multi_step_arithmetic() {
        let provider = Arc::new(ScriptedProvider::new([
            Message::assistant_blocks(vec![call("t1", "add", 3, 4)]),
            Message::assistant_blocks(vec![call("t2", "multiply", 7, 5), call("t3", "divide", 7, 2)]),
            Message::assistant("(3 + 4) * 5 = 35 and 7 / 2 = 3.5"),
        ]));
        let agent = CalculatorAgent::new(provider.clone(), &AgentConfig::default()).unwrap();

        let outcome = agent
            .respond(vec![Message::user("Add 3 and 4, multiply by 5, and divide 7 by 2.")])
            .await
            .unwrap();

        assert_eq!(outcome.status, RunStatus::Completed);
        assert_eq!(outcome.llm_calls, 3);
        let results: Vec<_> = outcome
            .conversation
            .iter()
            .filter_map(Message::tool_result_parts)
            .collect();
        assert_eq!(
            results,
            vec![("t1", "7", false), ("t2", "35", false), ("t3", "3.5", false)]
        );

        let request = &provider.requests()[0];
        assert_eq!(request.system.as_deref(), Some(SYSTEM_PROMPT));
        assert_eq!(request.temperature, Some(0.0));
        let tool_names: Vec<_> = request
            .tools
            .as_ref()
            .unwrap()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(tool_names, vec!["add", "multiply", "divide"]);
    }

    #[tokio::test]
    async fn test_division_by_zero_reported_to_model() {
        let provider = Arc::new(ScriptedProvider::new([
            Message::assistant_blocks(vec![call("z", "divide", 1, 0)]),
            Message::assistant("Dividing by zero is undefined."),
        ]));
        let agent = CalculatorAgent::new(provider, &AgentConfig::default()).unwrap();

        let mut context = Context::new();
        let answer = agent
            .process("What is 1 / 0?".to_string(), &mut context)
            .await
            .unwrap();

        assert_eq!(answer, "Dividing by zero is undefined.");
        assert_eq!(context.llm_calls(), Some(2));
    }

    #[tokio::test]
    async fn test_tool_results_reach_next_model_call() {
        let provider = Arc::new(ScriptedProvider::new([
            Message::assistant_blocks(vec![call("z", "divide", 1, 0)]),
            Message::assistant("undefined"),
        ]));
        let agent = CalculatorAgent::new(provider.clone(), &AgentConfig::default()).unwrap();
        agent.respond(vec![Message::user("1 / 0")]).await.unwrap();

        let second = &provider.requests()[1];
        let last = second.messages.last().unwrap();
        assert_eq!(
            last.tool_result_parts(),
            Some(("z", "Error: Agent processing failed: division by zero", true))
        );
    }
}
