//! Long-lived container session
//!
//! A [`ContainerSession`] owns nothing but a name: the container itself lives
//! in the container runtime and outlives every process that uses it.
//! `ensure_session` is an inspect-then-create sequence without locking, so two
//! callers starting at the same moment may both try to create the container.
//! The loser's create fails with a name conflict and its `ensure_session`
//! returns that error, even though the container exists and is usable. An
//! error from `ensure_session` therefore does not mean there is no sandbox.
//!
//! Command timeouts are enforced by the runtime inside the container. The
//! session also bounds the whole call at the timeout plus a grace period, in
//! case the runtime itself stops responding.

use crate::config::SandboxConfig;
use crate::docker::DockerCli;
use crate::error::{Result, SandboxError};
use crate::runtime::{CommandOutput, ContainerRuntime, SessionSpec};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// What `ensure_session` found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The container was already there
    Existing,
    /// The container was created by this call
    Created,
}

/// Extra time the runtime gets past a command's timeout before the call is
/// abandoned locally
pub const DEFAULT_EXEC_GRACE: Duration = Duration::from_secs(10);

/// Handle on the named sandbox container
pub struct ContainerSession {
    runtime: Arc<dyn ContainerRuntime>,
    spec: SessionSpec,
    grace: Duration,
}

impl ContainerSession {
    /// Create a session handle using `runtime`
    pub fn new(runtime: Arc<dyn ContainerRuntime>, spec: SessionSpec) -> Self {
        Self {
            runtime,
            spec,
            grace: DEFAULT_EXEC_GRACE,
        }
    }

    /// Replace the local grace period added on top of command timeouts
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Create a session handle backed by the configured container CLI
    pub fn from_config(config: &SandboxConfig) -> Self {
        Self::new(
            Arc::new(DockerCli::new(&config.runtime_binary)),
            config.session_spec(),
        )
    }

    /// The session identity
    pub fn spec(&self) -> &SessionSpec {
        &self.spec
    }

    /// Make sure the container exists, creating it if absent
    ///
    /// Always inspects; creates at most once per call.
    #[instrument(skip(self), fields(name = %self.spec.name))]
    pub async fn ensure_session(&self) -> Result<SessionState> {
        if self.runtime.inspect(&self.spec.name).await? {
            return Ok(SessionState::Existing);
        }

        info!(image = %self.spec.image, workdir = %self.spec.workdir, "Sandbox not found, creating");
        self.runtime.create(&self.spec).await?;
        Ok(SessionState::Created)
    }

    /// Run `command` in the session working directory
    ///
    /// Non-zero exit statuses are returned in the [`CommandOutput`]; only a
    /// timeout or a failure to reach the container runtime is an error.
    pub async fn execute(&self, command: &str, timeout: Duration) -> Result<CommandOutput> {
        self.execute_in(&self.spec.workdir, command, timeout).await
    }

    /// Run `command` in `workdir` inside the session container
    #[instrument(skip(self, command), fields(name = %self.spec.name, timeout_secs = timeout.as_secs()))]
    pub async fn execute_in(
        &self,
        workdir: &str,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandOutput> {
        let exec = self.runtime.exec(&self.spec.name, workdir, command, timeout);

        match tokio::time::timeout(timeout + self.grace, exec).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Sandbox runtime did not return in time");
                Err(SandboxError::Timeout {
                    command: command.to_string(),
                    timeout,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockContainerRuntime;
    use async_trait::async_trait;
    use mockall::Sequence;

    fn spec() -> SessionSpec {
        SessionSpec::new("box", "python:3.12", "/workspace")
    }

    #[tokio::test]
    async fn test_ensure_session_creates_at_most_once() {
        let mut runtime = MockContainerRuntime::new();
        let mut seq = Sequence::new();

        runtime
            .expect_inspect()
            .withf(|name| name == "box")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        runtime
            .expect_create()
            .withf(|spec| spec.image == "python:3.12" && spec.workdir == "/workspace")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        runtime
            .expect_inspect()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));

        let session = ContainerSession::new(Arc::new(runtime), spec());

        assert_eq!(session.ensure_session().await.unwrap(), SessionState::Created);
        assert_eq!(session.ensure_session().await.unwrap(), SessionState::Existing);
    }

    #[tokio::test]
    async fn test_execute_uses_session_workdir() {
        let mut runtime = MockContainerRuntime::new();
        runtime
            .expect_exec()
            .withf(|name, workdir, command, timeout| {
                name == "box"
                    && workdir == "/workspace"
                    && command == "false"
                    && *timeout == Duration::from_secs(5)
            })
            .returning(|_, _, _, _| {
                Ok(CommandOutput {
                    exit_code: 1,
                    ..CommandOutput::default()
                })
            });

        let session = ContainerSession::new(Arc::new(runtime), spec());
        let output = session
            .execute("false", Duration::from_secs(5))
            .await
            .unwrap();

        assert!(!output.success());
        assert_eq!(output.combined(), "Exit code: 1");
    }

    /// Runtime whose exec never finishes within a test's patience
    struct SlowRuntime;

    #[async_trait]
    impl ContainerRuntime for SlowRuntime {
        async fn inspect(&self, _name: &str) -> Result<bool> {
            Ok(true)
        }

        async fn create(&self, _spec: &SessionSpec) -> Result<()> {
            Ok(())
        }

        async fn exec(
            &self,
            _name: &str,
            _workdir: &str,
            _command: &str,
            _timeout: Duration,
        ) -> Result<CommandOutput> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(CommandOutput {
                stdout: "partial output".to_string(),
                ..CommandOutput::default()
            })
        }
    }

    #[tokio::test]
    async fn test_execute_reports_timeout() {
        let session =
            ContainerSession::new(Arc::new(SlowRuntime), spec()).with_grace(Duration::ZERO);

        let err = session
            .execute("sleep 600", Duration::from_millis(20))
            .await
            .unwrap_err();

        match err {
            SandboxError::Timeout { command, timeout } => {
                assert_eq!(command, "sleep 600");
                assert_eq!(timeout, Duration::from_millis(20));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_passes_timeout_to_runtime() {
        let mut runtime = MockContainerRuntime::new();
        runtime.expect_exec().returning(|_, _, command, timeout| {
            Err(SandboxError::Timeout {
                command: command.to_string(),
                timeout,
            })
        });

        let session = ContainerSession::new(Arc::new(runtime), spec());
        let err = session
            .execute("git clone big.git", Duration::from_secs(900))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "command timed out after 900s: git clone big.git"
        );
    }

    #[tokio::test]
    async fn test_ensure_session_losing_create_race_is_error() {
        let mut runtime = MockContainerRuntime::new();
        let mut seq = Sequence::new();
        runtime
            .expect_inspect()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        runtime
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(SandboxError::NonZeroExit {
                    code: 125,
                    output: "Conflict. The container name \"/box\" is already in use".to_string(),
                })
            });
        runtime
            .expect_inspect()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));

        let session = ContainerSession::new(Arc::new(runtime), spec());

        assert!(session.ensure_session().await.is_err());
        assert_eq!(session.ensure_session().await.unwrap(), SessionState::Existing);
    }
}
