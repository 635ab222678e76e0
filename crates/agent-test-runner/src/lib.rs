//! Test-runner agent for graph-agents
//!
//! The model drives two tools over a long-lived container: `setup_workflow`
//! clones a repository and installs its packages once, and `run_tests` runs
//! the suite for a path and returns its (truncated) output. The model then
//! summarizes the results.
//!
//! ```no_run
//! use agent_llm::providers::AnthropicProvider;
//! use agent_sandbox::SandboxConfig;
//! use agent_test_runner::{TestEnvironment, TestRunnerAgent, WorkflowConfig};
//! use agent_utils::AgentConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = Arc::new(TestEnvironment::from_config(
//!     SandboxConfig::default(),
//!     WorkflowConfig::default(),
//! ));
//! let provider = Arc::new(AnthropicProvider::from_env()?);
//! let agent = TestRunnerAgent::new(provider, env, &AgentConfig::from_env()?)?;
//! let outcome = agent.respond(Vec::new()).await?;
//! println!("{}", outcome.final_text());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod tools;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use agent::{DEFAULT_INSTRUCTION, SYSTEM_PROMPT, TestRunnerAgent};
pub use tools::{RunTestsTool, SetupWorkflowTool, TestEnvironment, test_runner_registry};
pub use workflow::{SetupReport, WorkflowConfig, run_tests, setup_workflow};
