//! Core abstractions shared by the graph-agents crates
//!
//! Defines the [`Agent`] trait every example agent implements, the [`Context`]
//! handed to agents during a run, and the framework-level [`Error`].

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
