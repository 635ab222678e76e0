//! Sandbox operations exposed as agent tools
//!
//! Structured sandbox results become text here and nowhere else.

use agent_core::Result as AgentResult;
use agent_llm::tools::schema;
use agent_sandbox::{ContainerSession, SandboxConfig, SandboxError};
use agent_tools::{Tool, ToolRegistry};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::warn;

use crate::workflow::{self, SetupReport, WorkflowConfig};

/// Everything the test-runner tools operate on
pub struct TestEnvironment {
    session: ContainerSession,
    sandbox: SandboxConfig,
    workflow: WorkflowConfig,
}

impl TestEnvironment {
    /// Bundle a session with its configuration
    pub fn new(session: ContainerSession, sandbox: SandboxConfig, workflow: WorkflowConfig) -> Self {
        Self {
            session,
            sandbox,
            workflow,
        }
    }

    /// Environment backed by the configured container CLI
    pub fn from_config(sandbox: SandboxConfig, workflow: WorkflowConfig) -> Self {
        Self::new(ContainerSession::from_config(&sandbox), sandbox, workflow)
    }

    /// See [`workflow::setup_workflow`]
    pub async fn setup_workflow(&self) -> agent_sandbox::Result<SetupReport> {
        workflow::setup_workflow(&self.session, &self.sandbox, &self.workflow).await
    }

    /// See [`workflow::run_tests`]
    pub async fn run_tests(&self, path: &str) -> agent_sandbox::Result<String> {
        workflow::run_tests(&self.session, &self.sandbox, &self.workflow, path).await
    }

    /// The workflow configuration
    pub fn workflow(&self) -> &WorkflowConfig {
        &self.workflow
    }
}

fn tool_error(tool: &str, err: &SandboxError) -> agent_core::Error {
    warn!(tool, kind = err.kind(), error = %err, "Sandbox operation failed");
    agent_core::Error::ProcessingFailed(err.to_string())
}

/// Tool preparing the sandbox: clone the repository and install packages
pub struct SetupWorkflowTool {
    env: Arc<TestEnvironment>,
}

impl SetupWorkflowTool {
    /// Create the tool over `env`
    pub fn new(env: Arc<TestEnvironment>) -> Self {
        Self { env }
    }
}

#[async_trait]
impl Tool for SetupWorkflowTool {
    async fn execute(&self, _params: Value) -> AgentResult<Value> {
        let report = self
            .env
            .setup_workflow()
            .await
            .map_err(|e| tool_error(self.name(), &e))?;

        let text = match report {
            SetupReport::AlreadyInitialized => format!(
                "Environment already set up ({} is present). Ready to run tests.",
                self.env.workflow().checkout_dir
            ),
            SetupReport::Initialized { log, failed_steps } if failed_steps.is_empty() => format!(
                "Environment set up successfully.\n\n{}",
                agent_sandbox::truncate_output(&log)
            ),
            SetupReport::Initialized { log, failed_steps } => format!(
                "Environment setup incomplete. Failed steps: {}. The checkout was removed, so \
                 setup_workflow will start over when called again.\n\n{}",
                failed_steps.join(", "),
                agent_sandbox::truncate_output(&log)
            ),
        };
        Ok(Value::String(text))
    }

    fn name(&self) -> &'static str {
        "setup_workflow"
    }

    fn description(&self) -> &'static str {
        "Set up the test environment: clone the repository and install its packages and test dependencies. Safe to call more than once."
    }

    fn input_schema(&self) -> Value {
        schema::object(json!({}), vec![])
    }
}

#[derive(Debug, Deserialize)]
struct RunTestsParams {
    path: String,
}

/// Tool running the test suite, or part of it
pub struct RunTestsTool {
    env: Arc<TestEnvironment>,
}

impl RunTestsTool {
    /// Create the tool over `env`
    pub fn new(env: Arc<TestEnvironment>) -> Self {
        Self { env }
    }
}

#[async_trait]
impl Tool for RunTestsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let RunTestsParams { path } = serde_json::from_value(params).map_err(|e| {
            agent_core::Error::ProcessingFailed(format!("Invalid parameters: {e}"))
        })?;

        let output = self
            .env
            .run_tests(&path)
            .await
            .map_err(|e| tool_error(self.name(), &e))?;
        Ok(Value::String(output))
    }

    fn name(&self) -> &'static str {
        "run_tests"
    }

    fn description(&self) -> &'static str {
        "Run the test suite for a path inside the repository checkout and return its output."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "path": schema::string("Test file or directory, relative to the repository root"),
            }),
            vec!["path"],
        )
    }
}

/// Registry with `setup_workflow` and `run_tests` over `env`
pub fn test_runner_registry(env: Arc<TestEnvironment>) -> AgentResult<ToolRegistry> {
    ToolRegistry::builder()
        .register(Arc::new(SetupWorkflowTool::new(env.clone())))
        .register(Arc::new(RunTestsTool::new(env)))
        .build()
}
