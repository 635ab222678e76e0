//! The `Agent` trait

use crate::{Context, Result};
use async_trait::async_trait;

/// Text in, text out
///
/// Agents that need the full transcript (tool calls and results) expose it
/// through their own `respond` methods; this trait is the common surface for
/// callers that only want the final answer.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Answer `input`
    ///
    /// Implementations may record run statistics into `context`, e.g. the
    /// number of model calls under [`crate::context::keys::LLM_CALLS`].
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Display name
    fn name(&self) -> &str;
}
