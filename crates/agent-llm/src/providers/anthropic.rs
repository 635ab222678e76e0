//! Anthropic Claude provider implementation
//!
//! This module implements the LLMProvider trait for Anthropic's Claude models.
//! See: https://docs.anthropic.com/en/api/messages

use crate::{
    CompletionRequest, CompletionResponse, ContentBlock, LLMError, LLMProvider, Message, Result,
    Role, StopReason, TokenUsage, ToolDefinition,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_API_BASE: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    api_base: String,
}

impl AnthropicProvider {
    /// Create a provider for the public API
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Create a provider from `ANTHROPIC_API_KEY` (and `ANTHROPIC_BASE_URL`,
    /// if set)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            LLMError::Configuration(format!("{API_KEY_ENV} environment variable not set"))
        })?;

        let provider = Self::new(api_key)?;
        Ok(match std::env::var(BASE_URL_ENV) {
            Ok(base) if !base.trim().is_empty() => provider.with_api_base(base),
            _ => provider,
        })
    }

    /// Send requests to `api_base` instead of the public endpoint
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// The API base URL in use
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        // The Messages API only accepts user/assistant turns
        let (system, messages) = split_system(request.system, request.messages);

        let body = AnthropicRequest {
            model: request.model,
            messages,
            system,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            tools: request.tools,
        };

        debug!("Sending request to Anthropic API");
        let response = self
            .client
            .post(format!("{}/messages", self.api_base))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(LLMError::from_status(status.as_u16(), error_text, &body.model));
        }

        let parsed: AnthropicResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        debug!(
            stop_reason = %parsed.stop_reason,
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            "Received response"
        );

        Ok(CompletionResponse {
            message: Message::assistant_blocks(parsed.content),
            stop_reason: stop_reason(&parsed.stop_reason),
            usage: TokenUsage {
                input_tokens: parsed.usage.input_tokens,
                output_tokens: parsed.usage.output_tokens,
            },
        })
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}

fn stop_reason(raw: &str) -> StopReason {
    match raw {
        "end_turn" => StopReason::EndTurn,
        "max_tokens" => StopReason::MaxTokens,
        "stop_sequence" => StopReason::StopSequence,
        "tool_use" => StopReason::ToolUse,
        other => {
            debug!(stop_reason = other, "Unknown stop reason");
            StopReason::EndTurn
        }
    }
}

/// Fold system-role messages into the top-level system prompt
///
/// The request-level prompt comes first, followed by each in-conversation
/// system message in order, separated by blank lines.
fn split_system(system: Option<String>, messages: Vec<Message>) -> (Option<String>, Vec<Message>) {
    let mut parts: Vec<String> = system.into_iter().collect();
    let mut turns = Vec::with_capacity(messages.len());

    for message in messages {
        if message.role == Role::System {
            if let Some(text) = message.text() {
                parts.push(text.to_string());
            }
        } else {
            turns.push(message);
        }
    }

    let system = if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    };
    (system, turns)
}

// Wire types for the Messages API

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDefinition>>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    stop_reason: String,
    usage: UsageResponse,
}

#[derive(Debug, Deserialize)]
struct UsageResponse {
    input_tokens: usize,
    output_tokens: usize,
}
