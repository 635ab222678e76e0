//! Error types for sandbox operations

use std::time::Duration;
use thiserror::Error;

/// Result type alias for sandbox operations
pub type Result<T> = std::result::Result<T, SandboxError>;

/// Failures at the sandbox boundary
#[derive(Debug, Error)]
pub enum SandboxError {
    /// The command did not finish within its wall-clock budget
    #[error("command timed out after {}s: {command}", .timeout.as_secs())]
    Timeout {
        /// Command that was running
        command: String,
        /// Budget that was exceeded
        timeout: Duration,
    },

    /// The command (or a container CLI call) exited unsuccessfully
    #[error("command exited with status {code}: {output}")]
    NonZeroExit {
        /// Exit status
        code: i32,
        /// Combined output
        output: String,
    },

    /// The container CLI could not be spawned or talked to
    #[error("container runtime error: {0}")]
    Transport(#[from] std::io::Error),

    /// Invalid sandbox configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl SandboxError {
    /// Short, stable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            SandboxError::Timeout { .. } => "timeout",
            SandboxError::NonZeroExit { .. } => "non_zero_exit",
            SandboxError::Transport(_) => "transport",
            SandboxError::Config(_) => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SandboxError::Timeout {
            command: "pytest".to_string(),
            timeout: Duration::from_secs(300),
        };
        assert_eq!(err.to_string(), "command timed out after 300s: pytest");
        assert_eq!(err.kind(), "timeout");

        let err = SandboxError::NonZeroExit {
            code: 128,
            output: "fatal: repository not found\nExit code: 128".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "command exited with status 128: fatal: repository not found\nExit code: 128"
        );
        assert_eq!(err.kind(), "non_zero_exit");
    }
}
