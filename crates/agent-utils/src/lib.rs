//! Shared utilities for graph-agents
//!
//! Logging setup and the environment-driven agent configuration used by the
//! example agents and the command-line front end.

pub mod config;
pub mod logging;

pub use config::{AgentConfig, ConfigError};
pub use logging::{init_tracing, init_tracing_json, init_tracing_with};
