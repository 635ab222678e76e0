//! Tool management and execution framework for graph-agents
//!
//! This crate provides the [`Tool`] trait for functions a model may call and
//! the read-only [`ToolRegistry`] the agent loop dispatches through.

pub mod registry;
pub mod tool;

pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use tool::Tool;
