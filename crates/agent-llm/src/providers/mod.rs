//! Concrete LLM provider implementations
//!
//! This module contains implementations of the LLMProvider trait for
//! various LLM services.

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "testing")]
pub mod scripted;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicProvider;

#[cfg(feature = "testing")]
pub use scripted::ScriptedProvider;
