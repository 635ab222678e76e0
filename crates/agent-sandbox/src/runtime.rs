//! Container runtime seam
//!
//! [`ContainerRuntime`] is the narrow interface the session manager needs
//! from a container CLI: inspect, create, exec. [`crate::DockerCli`] is the
//! production implementation.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identity and shape of the long-lived sandbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSpec {
    /// Container name the session is addressed by
    pub name: String,
    /// Base image used when the container has to be created
    pub image: String,
    /// Working directory for every command
    pub workdir: String,
}

impl SessionSpec {
    /// Create a new session spec
    pub fn new(
        name: impl Into<String>,
        image: impl Into<String>,
        workdir: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            workdir: workdir.into(),
        }
    }
}

/// Captured result of one command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Exit status; `-1` when the process was killed by a signal
    pub exit_code: i32,
}

impl CommandOutput {
    /// Whether the command exited with status zero
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout followed by stderr, with `Exit code: <n>` appended when non-zero
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len() + 16);
        out.push_str(&self.stdout);

        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }

        if !self.success() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&format!("Exit code: {}", self.exit_code));
        }

        out
    }

    /// Turn a non-zero exit into [`crate::SandboxError::NonZeroExit`]
    pub fn into_result(self) -> Result<CommandOutput> {
        if self.success() {
            Ok(self)
        } else {
            Err(crate::SandboxError::NonZeroExit {
                code: self.exit_code,
                output: self.combined(),
            })
        }
    }
}

/// Operations the session manager needs from a container CLI
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Whether a container with this name exists
    async fn inspect(&self, name: &str) -> Result<bool>;

    /// Start a detached, long-running container described by `spec`
    async fn create(&self, spec: &SessionSpec) -> Result<()>;

    /// Run a shell command inside the named container
    ///
    /// The command is stopped inside the container once `timeout` elapses and
    /// the call fails with [`crate::SandboxError::Timeout`]. Dropping the
    /// returned future only stops the local side.
    async fn exec(
        &self,
        name: &str,
        workdir: &str,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandOutput>;
}
