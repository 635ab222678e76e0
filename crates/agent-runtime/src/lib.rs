//! Agent runtime for graph-agents
//!
//! This crate provides the [`AgentExecutor`], which drives the tool-dispatch
//! loop between a model and a tool registry, and [`ToolAgent`], which exposes
//! an executor through the `Agent` trait.

pub mod agents;
pub mod executor;

// Re-export key types
pub use agents::{ToolAgent, record_outcome};
pub use executor::{
    AgentExecutor, AgentExecutorBuilder, ExecutorConfig, ExecutorEventHandler, RunOutcome,
    RunStatus,
};
