//! Scripted environment setup and test execution inside the sandbox
//!
//! Setup is idempotent on the checkout directory: once it exists, later runs
//! skip straight to testing. Every step is a separate `execute` call with the
//! setup timeout. A failing step is logged and the remaining steps still run;
//! if any step failed the checkout is removed again, so the directory only
//! survives a complete setup.

use agent_sandbox::{
    CommandOutput, ContainerSession, Result, SandboxConfig, SandboxError, truncate_output,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{info, instrument, warn};

/// Environment variable names read by [`WorkflowConfig::with_env_overrides`]
pub mod env {
    /// Repository to clone
    pub const REPO_URL: &str = "TEST_RUNNER_REPO_URL";
    /// Checkout directory, relative to the sandbox working directory
    pub const CHECKOUT_DIR: &str = "TEST_RUNNER_CHECKOUT_DIR";
    /// Test command, run from the checkout directory
    pub const TEST_COMMAND: &str = "TEST_RUNNER_TEST_COMMAND";
}

/// What to clone, install and run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Repository cloned with `git clone --depth 1`
    pub repo_url: String,

    /// Clone target relative to the sandbox workdir; its presence marks a
    /// finished setup
    pub checkout_dir: String,

    /// Installs the package manager used by the later steps
    pub prerequisite_command: String,

    /// Sub-packages installed in editable mode, relative to the checkout
    pub packages: Vec<String>,

    /// Extra packages the test suite needs, installed in one step
    pub test_dependencies: Vec<String>,

    /// Test command; the requested path is appended as the last argument
    pub test_command: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            repo_url: "https://github.com/langchain-ai/langgraph.git".to_string(),
            checkout_dir: "langgraph".to_string(),
            prerequisite_command: "pip install uv".to_string(),
            packages: vec![
                "libs/checkpoint".to_string(),
                "libs/langgraph".to_string(),
                "libs/prebuilt".to_string(),
            ],
            test_dependencies: vec![
                "pytest".to_string(),
                "pytest-asyncio".to_string(),
                "pytest-mock".to_string(),
                "syrupy".to_string(),
                "httpx".to_string(),
            ],
            test_command: "python -m pytest -q".to_string(),
        }
    }
}

impl WorkflowConfig {
    /// Apply overrides from process environment variables
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides through an arbitrary key lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(env::REPO_URL) {
            self.repo_url = url;
        }
        if let Some(dir) = non_empty(env::CHECKOUT_DIR) {
            self.checkout_dir = dir;
        }
        if let Some(command) = non_empty(env::TEST_COMMAND) {
            self.test_command = command;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.repo_url.trim().is_empty() {
            return Err(SandboxError::Config("repo_url must not be empty".to_string()));
        }

        let dir = self.checkout_dir.trim();
        if dir.is_empty() || dir.starts_with('/') || dir.split('/').any(|part| part == "..") {
            return Err(SandboxError::Config(format!(
                "checkout_dir must be a relative path inside the workdir, got {:?}",
                self.checkout_dir
            )));
        }

        if self.test_command.trim().is_empty() {
            return Err(SandboxError::Config(
                "test_command must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Absolute checkout path inside the container
    pub fn checkout_path(&self, sandbox: &SandboxConfig) -> String {
        format!(
            "{}/{}",
            sandbox.workdir.trim_end_matches('/'),
            self.checkout_dir
        )
    }

    fn marker_command(&self) -> String {
        format!("test -d {}", quote(&self.checkout_dir))
    }

    fn cleanup_command(&self) -> String {
        format!("rm -rf {}", quote(&self.checkout_dir))
    }

    /// Setup steps in execution order, as `(label, command)`
    pub fn setup_steps(&self) -> Vec<(String, String)> {
        let mut steps = vec![
            (
                "prerequisite".to_string(),
                self.prerequisite_command.clone(),
            ),
            (
                "clone".to_string(),
                format!(
                    "git clone --depth 1 {} {}",
                    quote(&self.repo_url),
                    quote(&self.checkout_dir)
                ),
            ),
        ];

        for package in &self.packages {
            let path = format!("{}/{package}", self.checkout_dir);
            steps.push((
                format!("install {package}"),
                format!("uv pip install --system -e {}", quote(&path)),
            ));
        }

        if !self.test_dependencies.is_empty() {
            let deps: Vec<_> = self.test_dependencies.iter().map(|d| quote(d)).collect();
            steps.push((
                "test dependencies".to_string(),
                format!("uv pip install --system {}", deps.join(" ")),
            ));
        }

        steps
    }

    /// The test command scoped to `path`
    pub fn test_command_for(&self, path: &str) -> String {
        let path = path.trim();
        if path.is_empty() {
            self.test_command.clone()
        } else {
            format!("{} {}", self.test_command, quote(path))
        }
    }
}

/// Result of [`setup_workflow`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupReport {
    /// The checkout was already present; nothing was run
    AlreadyInitialized,
    /// Every setup step was run
    Initialized {
        /// Output of all steps in order, each under a `== step ==` header
        log: String,
        /// Labels of the steps that failed, in order; empty on success
        failed_steps: Vec<String>,
    },
}

impl SetupReport {
    /// Whether the sandbox is ready for testing
    pub fn is_ready(&self) -> bool {
        match self {
            SetupReport::AlreadyInitialized => true,
            SetupReport::Initialized { failed_steps, .. } => failed_steps.is_empty(),
        }
    }
}

/// Prepare the sandbox for testing
///
/// Ensures the container exists, then checks for the checkout directory. If
/// it is missing, runs the prerequisite, clone, package installs and
/// test-dependency install in order. Step failures (non-zero exit, timeout,
/// transport) end up in the log and in `failed_steps`; only failing to reach
/// the container at all is an error.
#[instrument(skip_all, fields(name = %session.spec().name, repo = %workflow.repo_url))]
pub async fn setup_workflow(
    session: &ContainerSession,
    sandbox: &SandboxConfig,
    workflow: &WorkflowConfig,
) -> Result<SetupReport> {
    session.ensure_session().await?;

    let marker = session
        .execute(&workflow.marker_command(), sandbox.command_timeout)
        .await?;
    if marker.success() {
        info!(checkout_dir = %workflow.checkout_dir, "Environment already initialized");
        return Ok(SetupReport::AlreadyInitialized);
    }

    let mut log = String::new();
    let mut failed_steps = Vec::new();
    for (step, command) in workflow.setup_steps() {
        info!(step = %step, "Running setup step");

        let result = session.execute(&command, sandbox.setup_timeout).await;
        if !append_step(&mut log, &step, result) {
            failed_steps.push(step);
        }
    }

    if failed_steps.is_empty() {
        info!(log_chars = log.chars().count(), "Environment initialized");
    } else {
        warn!(failed = ?failed_steps, "Setup finished with failures, removing checkout");
        let result = session
            .execute(&workflow.cleanup_command(), sandbox.command_timeout)
            .await;
        append_step(&mut log, "cleanup", result);
    }

    Ok(SetupReport::Initialized { log, failed_steps })
}

/// Append a step's output (or its error) to `log`; returns whether it succeeded
fn append_step(log: &mut String, step: &str, result: Result<CommandOutput>) -> bool {
    log.push_str(&format!("== {step} ==\n"));
    let succeeded = match result {
        Ok(output) => {
            if !output.success() {
                warn!(step, exit_code = output.exit_code, "Setup step failed");
            }
            log.push_str(&output.combined());
            output.success()
        }
        Err(e) => {
            warn!(step, kind = e.kind(), error = %e, "Setup step failed");
            log.push_str(&e.to_string());
            false
        }
    };
    if !log.ends_with('\n') {
        log.push('\n');
    }
    succeeded
}

/// Run the test command scoped to `path` from the checkout directory
///
/// Test failures are part of the returned text (with their exit code), not
/// an error. The text is truncated with [`truncate_output`].
#[instrument(skip_all, fields(name = %session.spec().name, path = %path))]
pub async fn run_tests(
    session: &ContainerSession,
    sandbox: &SandboxConfig,
    workflow: &WorkflowConfig,
    path: &str,
) -> Result<String> {
    session.ensure_session().await?;

    let output = session
        .execute_in(
            &workflow.checkout_path(sandbox),
            &workflow.test_command_for(path),
            sandbox.command_timeout,
        )
        .await?;

    let combined = output.combined();
    info!(
        exit_code = output.exit_code,
        output_chars = combined.chars().count(),
        "Tests finished"
    );
    Ok(truncate_output(&combined).into_owned())
}

/// Single-quote `arg` for `sh -c` unless it is made only of safe characters
fn quote(arg: &str) -> Cow<'_, str> {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@=+,".contains(c));

    if safe {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}
