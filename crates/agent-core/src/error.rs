//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// Agent or registry construction failed
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    /// A function-call request named a tool that is not registered
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Caller supplied an argument outside the accepted range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
