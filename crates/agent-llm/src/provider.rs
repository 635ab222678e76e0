//! The model provider seam

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A language model that can answer a conversation, optionally with tool use
///
/// `AnthropicProvider` (feature `anthropic`) talks to the hosted API;
/// `ScriptedProvider` (feature `testing`) replays canned replies.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Send one request and return the model's reply
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Short provider name, e.g. `"anthropic"`
    fn name(&self) -> &str;
}
