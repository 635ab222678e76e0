//! Container session manager for graph-agents
//!
//! Keeps one named, long-lived container around and runs shell commands in
//! it through the container CLI. Results are structured ([`CommandOutput`],
//! [`SandboxError`]); turning them into text is left to the caller.
//!
//! ```no_run
//! use agent_sandbox::{ContainerSession, SandboxConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> agent_sandbox::Result<()> {
//! let session = ContainerSession::from_config(&SandboxConfig::default());
//! session.ensure_session().await?;
//! let output = session.execute("python --version", Duration::from_secs(30)).await?;
//! println!("{}", output.combined());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod docker;
pub mod error;
pub mod runtime;
pub mod session;
pub mod truncate;

pub use config::{SandboxConfig, SandboxConfigBuilder};
pub use docker::DockerCli;
pub use error::{Result, SandboxError};
pub use runtime::{CommandOutput, ContainerRuntime, SessionSpec};
pub use session::{ContainerSession, DEFAULT_EXEC_GRACE, SessionState};
pub use truncate::{HEAD_CHARS, MAX_OUTPUT_CHARS, TAIL_CHARS, truncate_output};
