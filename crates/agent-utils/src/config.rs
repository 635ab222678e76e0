//! Agent configuration shared by the example agents
//!
//! Values come from the environment (`AGENT_MODEL`, `AGENT_MAX_TOKENS`,
//! `AGENT_TEMPERATURE`, `AGENT_MAX_ITERATIONS`) with defaults matching the
//! calculator agent: Claude Sonnet at temperature zero.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable names read by [`AgentConfig::from_env`]
pub mod env {
    /// Model identifier
    pub const MODEL: &str = "AGENT_MODEL";
    /// Max tokens per completion
    pub const MAX_TOKENS: &str = "AGENT_MAX_TOKENS";
    /// Sampling temperature
    pub const TEMPERATURE: &str = "AGENT_TEMPERATURE";
    /// Cap on model calls per run
    pub const MAX_ITERATIONS: &str = "AGENT_MAX_ITERATIONS";
}

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name
        key: String,
        /// Raw value
        value: String,
    },

    /// A value parsed but is out of range
    #[error("{0}")]
    OutOfRange(String),
}

/// Model and loop settings for an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Model identifier
    pub model: String,
    /// Max tokens per completion
    pub max_tokens: usize,
    /// Sampling temperature (0.0-1.0)
    pub temperature: f32,
    /// Cap on model calls per run
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 4096,
            temperature: 0.0,
            max_iterations: 10,
        }
    }
}

impl AgentConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(model) = lookup(env::MODEL).filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        if let Some(raw) = lookup(env::MAX_TOKENS) {
            config.max_tokens = parse(env::MAX_TOKENS, &raw)?;
        }
        if let Some(raw) = lookup(env::TEMPERATURE) {
            config.temperature = parse(env::TEMPERATURE, &raw)?;
        }
        if let Some(raw) = lookup(env::MAX_ITERATIONS) {
            config.max_iterations = parse(env::MAX_ITERATIONS, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::OutOfRange(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::OutOfRange(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::OutOfRange(format!(
                "temperature must be within 0.0..=1.0, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
