//! Container runtime backed by the Docker CLI
//!
//! Every operation spawns the CLI as a child process with
//! `tokio::process::Command`. Podman accepts the same arguments, so the binary
//! is configurable.
//!
//! Commands run under coreutils `timeout` inside the container, so a command
//! that overruns is stopped there and not only in the local CLI process.

use crate::error::{Result, SandboxError};
use crate::runtime::{CommandOutput, ContainerRuntime, SessionSpec};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Delay between SIGTERM and SIGKILL for a command that overran
const KILL_AFTER: &str = "5s";

/// Exit status `timeout` reports when it had to stop the command
const TIMEOUT_EXIT_CODE: i32 = 124;

/// Docker (or Podman) CLI runtime
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl DockerCli {
    /// Create a runtime that invokes `binary`
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The CLI binary in use
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Build a CLI invocation with captured output
    ///
    /// The child is killed if the future awaiting it is dropped, which is how
    /// command timeouts take effect.
    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.command(args).output().await?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

/// Arguments for `docker run` starting a detached, idle container
pub(crate) fn create_args(spec: &SessionSpec) -> Vec<&str> {
    vec![
        "run",
        "-d",
        "--name",
        spec.name.as_str(),
        "-w",
        spec.workdir.as_str(),
        spec.image.as_str(),
        "sleep",
        "infinity",
    ]
}

/// Arguments for `docker exec` running `command` through `sh -c`, stopped
/// inside the container after `limit` (a `timeout` duration argument)
pub(crate) fn exec_args<'a>(
    name: &'a str,
    workdir: &'a str,
    command: &'a str,
    limit: &'a str,
) -> Vec<&'a str> {
    vec![
        "exec", "-w", workdir, name, "timeout", "-k", KILL_AFTER, limit, "sh", "-c", command,
    ]
}

/// Format `timeout` as a `timeout(1)` duration, in seconds
pub(crate) fn timeout_arg(timeout: Duration) -> String {
    if timeout.subsec_millis() == 0 {
        format!("{}s", timeout.as_secs())
    } else {
        format!("{}.{:03}s", timeout.as_secs(), timeout.subsec_millis())
    }
}

/// `docker inspect` exits non-zero when no such container exists
fn container_exists(output: &CommandOutput) -> bool {
    output.success()
}

/// A failed `docker run` (name conflict, missing image) is an error
fn creation_result(output: CommandOutput) -> Result<()> {
    output.into_result().map(|_| ())
}

/// Map the in-container `timeout` status to [`SandboxError::Timeout`]
fn exec_result(output: CommandOutput, command: &str, timeout: Duration) -> Result<CommandOutput> {
    if output.exit_code == TIMEOUT_EXIT_CODE {
        warn!(timeout_secs = timeout.as_secs(), "Command stopped inside the sandbox");
        return Err(SandboxError::Timeout {
            command: command.to_string(),
            timeout,
        });
    }
    Ok(output)
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    #[instrument(skip(self), fields(binary = %self.binary))]
    async fn inspect(&self, name: &str) -> Result<bool> {
        let output = self.run(&["inspect", "--type", "container", name]).await?;
        debug!(exit_code = output.exit_code, "Container inspection finished");
        Ok(container_exists(&output))
    }

    #[instrument(skip(self, spec), fields(binary = %self.binary, name = %spec.name, image = %spec.image))]
    async fn create(&self, spec: &SessionSpec) -> Result<()> {
        info!("Creating sandbox container");
        let output = self.run(&create_args(spec)).await?;
        creation_result(output)
    }

    #[instrument(skip(self, command), fields(binary = %self.binary))]
    async fn exec(
        &self,
        name: &str,
        workdir: &str,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandOutput> {
        let preview: String = command.chars().take(200).collect();
        debug!(command = %preview, "Executing in sandbox");
        let limit = timeout_arg(timeout);
        let output = self.run(&exec_args(name, workdir, command, &limit)).await?;
        exec_result(output, command, timeout)
    }
}
