//! Agent executor for running agent loops
//!
//! The AgentExecutor implements the tool-dispatch loop:
//! 1. Call the LLM with the conversation and the available tools
//! 2. Append the reply to the conversation
//! 3. If the reply requests tools, execute each one in order, append one
//!    tool result per request, and loop back
//! 4. If the reply requests nothing, the run is complete
//!
//! The number of model calls is capped by a required `max_iterations`
//! argument; a model that keeps requesting tools stops the run with
//! [`RunStatus::IterationLimitReached`] instead of looping forever.

use agent_core::{Error, Result};
use agent_llm::{CompletionRequest, LLMProvider, Message, ToolCall, ToolDefinition};
use agent_tools::ToolRegistry;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Event handler for agent execution events
///
/// Implement this trait to receive callbacks during agent execution,
/// useful for streaming tool call status to clients.
#[async_trait]
pub trait ExecutorEventHandler: Send + Sync {
    /// Called when a tool execution starts
    async fn on_tool_start(&self, _id: &str, _name: &str, _input: &Value) {}

    /// Called when a tool execution completes
    async fn on_tool_done(
        &self,
        _id: &str,
        _name: &str,
        _result: std::result::Result<&str, &str>,
        _duration_ms: u64,
    ) {
    }

    /// Called when the agent completes
    async fn on_complete(&self, _result: &str) {}

    /// Called when an error occurs
    async fn on_error(&self, _error: &str) {}
}

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Default iteration cap used by [`AgentExecutor::run`] callers that
    /// don't choose one themselves
    pub max_iterations: usize,

    /// Model to use
    pub model: String,

    /// System prompt
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            model: "claude-sonnet-4-5-20250929".to_string(),
            system_prompt: None,
            max_tokens: 4096,
            temperature: Some(0.0),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The last reply carried no function-call requests
    Completed,
    /// The model was still requesting tools when the cap was hit
    IterationLimitReached,
}

impl RunStatus {
    /// Stable lowercase label, used in logs and the agent context
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::IterationLimitReached => "iteration_limit_reached",
        }
    }
}

/// Result of driving the loop over a conversation
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The full conversation including every reply and tool result
    pub conversation: Vec<Message>,
    /// Number of model invocations made
    pub llm_calls: usize,
    /// How the run ended
    pub status: RunStatus,
}

impl RunOutcome {
    /// The last message of the conversation
    pub fn last_message(&self) -> Option<&Message> {
        self.conversation.last()
    }

    /// Text of the final reply
    ///
    /// Falls back to a fixed notice when the run was cut off by the cap or the
    /// model answered without text.
    pub fn final_text(&self) -> String {
        match self.status {
            RunStatus::IterationLimitReached => {
                "Max iterations reached without completion".to_string()
            }
            RunStatus::Completed => self
                .last_message()
                .and_then(Message::text)
                .unwrap_or("No response")
                .to_string(),
        }
    }
}

/// Executes an agent loop: LLM → tool calls → execution → loop back
///
/// The AgentExecutor orchestrates the interaction between an LLM provider
/// and a tool registry.
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            config,
            event_handler: None,
        }
    }

    /// Create a new builder
    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder::new()
    }

    /// Set the event handler for receiving execution events
    pub fn with_event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Get the executor configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Get the tool registry
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// Execute the agent loop with a single user query
    ///
    /// Returns the final reply text.
    pub async fn run(&self, user_message: String, max_iterations: usize) -> Result<String> {
        let outcome = self
            .run_conversation(vec![Message::user(user_message)], max_iterations)
            .await?;
        Ok(outcome.final_text())
    }

    /// Execute the agent loop with prior conversation history
    pub async fn run_with_history(
        &self,
        user_message: String,
        history: Vec<Message>,
        max_iterations: usize,
    ) -> Result<RunOutcome> {
        let mut conversation = history;
        conversation.push(Message::user(user_message));
        self.run_conversation(conversation, max_iterations).await
    }

    /// Drive the loop over `conversation` until a reply requests no tools
    ///
    /// At most `max_iterations` model calls are made. Errors from the model
    /// abort the run; tool failures are reported to the model as error tool
    /// results and the run continues.
    pub async fn run_conversation(
        &self,
        initial_conversation: Vec<Message>,
        max_iterations: usize,
    ) -> Result<RunOutcome> {
        if max_iterations == 0 {
            return Err(Error::InvalidArgument(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if initial_conversation.is_empty() {
            return Err(Error::InvalidArgument(
                "conversation must contain at least one message".to_string(),
            ));
        }

        let mut conversation = initial_conversation;
        let mut llm_calls = 0;
        let tools = self.build_tool_definitions();
        debug!(tool_count = tools.len(), "Available tools");

        loop {
            llm_calls += 1;
            info!(
                iteration = llm_calls,
                max_iterations = max_iterations,
                "Agent iteration started"
            );

            let reply = match self.call_model(&conversation, &tools).await {
                Ok(reply) => reply,
                Err(e) => {
                    if let Some(handler) = &self.event_handler {
                        handler.on_error(&e.to_string()).await;
                    }
                    return Err(e);
                }
            };

            let has_tool_uses = reply.has_tool_uses();
            conversation.push(reply);

            if !has_tool_uses {
                let outcome = RunOutcome {
                    conversation,
                    llm_calls,
                    status: RunStatus::Completed,
                };
                let text = outcome.final_text();
                info!(
                    llm_calls = llm_calls,
                    response_length = text.len(),
                    "Agent completed naturally"
                );
                if let Some(handler) = &self.event_handler {
                    handler.on_complete(&text).await;
                }
                return Ok(outcome);
            }

            let results = match conversation.last() {
                Some(reply) => self.execute_tools(reply).await,
                None => Vec::new(),
            };
            info!(
                result_count = results.len(),
                "Tool execution completed, continuing agent loop"
            );
            conversation.extend(results);

            if llm_calls >= max_iterations {
                warn!(max_iterations, "Max iterations reached, stopping");
                return Ok(RunOutcome {
                    conversation,
                    llm_calls,
                    status: RunStatus::IterationLimitReached,
                });
            }
        }
    }

    /// Send the conversation to the model and return its reply
    async fn call_model(
        &self,
        conversation: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<Message> {
        if let Some(last_msg) = conversation.last() {
            let msg_preview: String = last_msg.text().unwrap_or("").chars().take(200).collect();
            debug!(
                role = ?last_msg.role,
                message_preview = %msg_preview,
                "Processing message"
            );
        }

        info!(
            model = %self.config.model,
            max_tokens = self.config.max_tokens,
            temperature = ?self.config.temperature,
            tool_count = tools.len(),
            "Sending request to LLM"
        );

        let mut request_builder = CompletionRequest::builder(&self.config.model)
            .messages(conversation.to_vec())
            .max_tokens(self.config.max_tokens);

        if let Some(system) = &self.config.system_prompt {
            request_builder = request_builder.system(system.clone());
        }
        if let Some(temperature) = self.config.temperature {
            request_builder = request_builder.temperature(temperature);
        }
        // Only add tools if we have any
        if !tools.is_empty() {
            request_builder = request_builder.tools(tools.to_vec());
        }

        let response = self
            .provider
            .complete(request_builder.build())
            .await
            .map_err(|e| Error::ProcessingFailed(e.to_string()))?;

        info!(
            stop_reason = ?response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "LLM response received"
        );

        let response_preview: String = response
            .message
            .text()
            .unwrap_or("")
            .chars()
            .take(300)
            .collect();
        debug!(response_preview = %response_preview, "LLM response content preview");

        Ok(response.message)
    }

    /// Build tool definitions from the registry
    fn build_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tool_registry
            .list_tools()
            .iter()
            .map(|tool| ToolDefinition::new(tool.name(), tool.description(), tool.input_schema()))
            .collect()
    }

    /// Execute the function-call requests of an assistant message
    ///
    /// Returns exactly one tool-result message per request, in request order.
    async fn execute_tools(&self, message: &Message) -> Vec<Message> {
        let tool_uses = message.tool_uses();
        info!(tool_count = tool_uses.len(), "Starting tool execution");

        let mut results = Vec::with_capacity(tool_uses.len());
        for call in tool_uses {
            results.push(self.execute_tool(call).await);
        }
        results
    }

    /// Execute a single request, capturing any failure as an error result
    async fn execute_tool(&self, call: ToolCall<'_>) -> Message {
        let ToolCall { id, name, input } = call;

        let input_preview: String = input.to_string().chars().take(500).collect();
        info!(
            tool_name = %name,
            tool_id = %id,
            input_preview = %input_preview,
            "Executing tool"
        );

        if let Some(handler) = &self.event_handler {
            handler.on_tool_start(id, name, input).await;
        }

        let start_time = Instant::now();
        let outcome = match self.tool_registry.get(name) {
            Some(tool) => tool.execute(input.clone()).await.map(|v| stringify_result(&v)),
            None => Err(Error::ToolNotFound(name.to_string())),
        };
        let duration_ms = start_time.elapsed().as_millis() as u64;

        match outcome {
            Ok(result_str) => {
                let result_preview: String = result_str.chars().take(500).collect();
                info!(
                    tool_name = %name,
                    duration_ms = duration_ms,
                    result_length = result_str.len(),
                    result_preview = %result_preview,
                    "Tool execution succeeded"
                );

                if let Some(handler) = &self.event_handler {
                    handler
                        .on_tool_done(id, name, Ok(&result_str), duration_ms)
                        .await;
                }

                Message::tool_result(id.to_string(), result_str)
            }
            Err(e) => {
                let error_str = format!("Error: {e}");
                warn!(
                    tool_name = %name,
                    duration_ms = duration_ms,
                    error = %e,
                    "Tool execution failed"
                );

                if let Some(handler) = &self.event_handler {
                    handler
                        .on_tool_done(id, name, Err(&error_str), duration_ms)
                        .await;
                }

                Message::tool_error(id.to_string(), error_str)
            }
        }
    }
}

/// Render a tool's JSON return value as tool-result text
///
/// Strings are embedded verbatim; every other value uses its JSON form.
fn stringify_result(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
}

impl AgentExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: Arc::new(ToolRegistry::new()),
            config: ExecutorConfig::default(),
            event_handler: None,
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = registry;
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Set the event handler
    pub fn event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Build the executor
    pub fn build(self) -> Result<AgentExecutor> {
        let provider = self
            .provider
            .ok_or_else(|| Error::InitializationFailed("Provider not set".to_string()))?;

        let mut executor = AgentExecutor::new(provider, self.tool_registry, self.config);
        executor.event_handler = self.event_handler;
        Ok(executor)
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_llm::ContentBlock;
    use agent_llm::providers::ScriptedProvider;
    use agent_tools::Tool;
    use serde_json::json;
    use std::sync::Mutex;

    /// Adds `a` and `b`, failing when `b` is negative
    struct Sum;

    #[async_trait]
    impl Tool for Sum {
        async fn execute(&self, params: Value) -> Result<Value> {
            let a = params["a"].as_i64().unwrap_or_default();
            let b = params["b"].as_i64().unwrap_or_default();
            if b < 0 {
                return Err(Error::ProcessingFailed("negative operand".to_string()));
            }
            Ok(json!(a + b))
        }

        fn name(&self) -> &str {
            "sum"
        }

        fn description(&self) -> &str {
            "Add two numbers"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object"})
        }
    }

    fn tool_use(id: &str, name: &str, input: Value) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input,
        }
    }

    fn executor(provider: Arc<ScriptedProvider>) -> AgentExecutor {
        let registry = ToolRegistry::builder()
            .register(Arc::new(Sum))
            .build()
            .unwrap();

        AgentExecutor::builder()
            .provider(provider)
            .tool_registry(Arc::new(registry))
            .system_prompt("Test prompt")
            .build()
            .unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ExecutorEventHandler for Recorder {
        async fn on_tool_start(&self, id: &str, name: &str, _input: &Value) {
            self.events.lock().unwrap().push(format!("start {name} {id}"));
        }

        async fn on_tool_done(
            &self,
            id: &str,
            _name: &str,
            result: std::result::Result<&str, &str>,
            _duration_ms: u64,
        ) {
            let tag = if result.is_ok() { "ok" } else { "err" };
            self.events.lock().unwrap().push(format!("done {id} {tag}"));
        }

        async fn on_complete(&self, result: &str) {
            self.events.lock().unwrap().push(format!("complete {result}"));
        }
    }

    #[test]
    fn test_builder() {
        let builder = AgentExecutorBuilder::new()
            .model("test-model")
            .max_iterations(5)
            .system_prompt("Test prompt");

        assert_eq!(builder.config.model, "test-model");
        assert_eq!(builder.config.max_iterations, 5);
        assert_eq!(
            builder.config.system_prompt,
            Some("Test prompt".to_string())
        );
    }

    #[test]
    fn test_builder_requires_provider() {
        assert!(AgentExecutorBuilder::new().build().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = ExecutorConfig::default();
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.model, "claude-sonnet-4-5-20250929");
        assert_eq!(config.temperature, Some(0.0));
    }

    #[tokio::test]
    async fn test_reply_without_tool_calls_terminates() {
        let provider = Arc::new(ScriptedProvider::new([Message::assistant("Hello!")]));
        let executor = executor(provider.clone());

        let outcome = executor
            .run_conversation(vec![Message::user("hi")], 5)
            .await
            .unwrap();

        assert_eq!(outcome.status, RunStatus::Completed);
        assert_eq!(outcome.llm_calls, 1);
        assert_eq!(outcome.conversation.len(), 2);
        assert_eq!(outcome.last_message().unwrap().text(), Some("Hello!"));

        let requests = provider.requests();
        assert_eq!(requests[0].system.as_deref(), Some("Test prompt"));
        assert_eq!(requests[0].tools.as_ref().unwrap()[0].name, "sum");
    }

    #[tokio::test]
    async fn test_history_is_sent_before_new_message() {
        let provider = Arc::new(ScriptedProvider::new([Message::assistant("12")]));
        let executor = executor(provider.clone());

        let history = vec![
            Message::user("What is 3 times 4?"),
            Message::assistant("12"),
        ];
        let outcome = executor
            .run_with_history("And again?".to_string(), history, 2)
            .await
            .unwrap();

        assert_eq!(outcome.conversation.len(), 4);
        let sent = &provider.requests()[0].messages;
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2].text(), Some("And again?"));
    }

    #[tokio::test]
    async fn test_each_request_gets_one_result_in_order() {
        let provider = Arc::new(ScriptedProvider::new([
            Message::assistant_blocks(vec![
                tool_use("call_1", "sum", json!({"a": 1, "b": 2})),
                tool_use("call_2", "sum", json!({"a": 10, "b": 20})),
                tool_use("call_3", "sum", json!({"a": 5, "b": 5})),
            ]),
            Message::assistant("Done: 3, 30, 10"),
        ]));
        let executor = executor(provider.clone());

        let outcome = executor
            .run_conversation(vec![Message::user("add stuff")], 5)
            .await
            .unwrap();

        assert_eq!(outcome.llm_calls, 2);
        // user, assistant(tool uses), 3 results, assistant(final)
        assert_eq!(outcome.conversation.len(), 6);
        let results: Vec<_> = outcome.conversation[2..5]
            .iter()
            .map(|m| m.tool_result_parts().unwrap())
            .collect();
        assert_eq!(
            results,
            vec![
                ("call_1", "3", false),
                ("call_2", "30", false),
                ("call_3", "10", false),
            ]
        );

        // The second model call saw the tool results
        assert_eq!(provider.requests()[1].messages.len(), 5);
    }

    #[tokio::test]
    async fn test_tool_failures_become_error_results() {
        let provider = Arc::new(ScriptedProvider::new([
            Message::assistant_blocks(vec![
                tool_use("bad_args", "sum", json!({"a": 1, "b": -1})),
                tool_use("missing", "subtract", json!({"a": 1, "b": 1})),
            ]),
            Message::assistant("Both calls failed."),
        ]));
        let executor = executor(provider);

        let outcome = executor
            .run_conversation(vec![Message::user("go")], 5)
            .await
            .unwrap();

        assert_eq!(outcome.status, RunStatus::Completed);
        let (id, content, is_error) = outcome.conversation[2].tool_result_parts().unwrap();
        assert_eq!(id, "bad_args");
        assert!(is_error);
        assert!(content.contains("negative operand"));

        let (id, content, is_error) = outcome.conversation[3].tool_result_parts().unwrap();
        assert_eq!(id, "missing");
        assert!(is_error);
        assert_eq!(content, "Error: Tool not found: subtract");
    }

    #[tokio::test]
    async fn test_iteration_cap_stops_run() {
        let looping = || {
            Message::assistant_blocks(vec![tool_use("again", "sum", json!({"a": 1, "b": 1}))])
        };
        let provider = Arc::new(ScriptedProvider::new([looping(), looping(), looping()]));
        let executor = executor(provider.clone());

        let outcome = executor
            .run_conversation(vec![Message::user("loop")], 2)
            .await
            .unwrap();

        assert_eq!(outcome.status, RunStatus::IterationLimitReached);
        assert_eq!(outcome.llm_calls, 2);
        assert_eq!(provider.calls(), 2);
        // Every request made it into the transcript with its result
        assert!(outcome.last_message().unwrap().tool_result_parts().is_some());
        assert_eq!(outcome.final_text(), "Max iterations reached without completion");
    }

    #[tokio::test]
    async fn test_zero_iterations_rejected() {
        let provider = Arc::new(ScriptedProvider::new(Vec::<Message>::new()));
        let executor = executor(provider.clone());

        let err = executor
            .run_conversation(vec![Message::user("hi")], 0)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        // Script is empty, so the first call fails
        let provider = Arc::new(ScriptedProvider::new(Vec::<Message>::new()));
        let executor = executor(provider);

        let err = executor.run("hi".to_string(), 3).await.unwrap_err();
        assert!(matches!(err, Error::ProcessingFailed(_)));
    }

    #[tokio::test]
    async fn test_event_handler_sees_tool_lifecycle() {
        let provider = Arc::new(ScriptedProvider::new([
            Message::assistant_blocks(vec![tool_use("c1", "sum", json!({"a": 2, "b": 3}))]),
            Message::assistant("5"),
        ]));
        let recorder = Arc::new(Recorder::default());
        let executor = executor(provider).with_event_handler(recorder.clone());

        let text = executor.run("2 + 3".to_string(), 4).await.unwrap();
        assert_eq!(text, "5");

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(events, vec!["start sum c1", "done c1 ok", "complete 5"]);
    }

    #[test]
    fn test_stringify_result() {
        assert_eq!(stringify_result(&json!(5)), "5");
        assert_eq!(stringify_result(&json!(5.0)), "5.0");
        assert_eq!(stringify_result(&json!("plain text")), "plain text");
    }
}
