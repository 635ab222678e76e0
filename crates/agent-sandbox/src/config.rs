//! Configuration for the sandbox session

use crate::error::{Result, SandboxError};
use crate::runtime::SessionSpec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable names read by [`SandboxConfig::with_env_overrides`]
pub mod env {
    /// Container name
    pub const NAME: &str = "SANDBOX_NAME";
    /// Base image
    pub const IMAGE: &str = "SANDBOX_IMAGE";
    /// Working directory inside the container
    pub const WORKDIR: &str = "SANDBOX_WORKDIR";
    /// Container CLI binary (`docker`, `podman`)
    pub const RUNTIME: &str = "SANDBOX_RUNTIME";
}

/// Configuration for the sandbox session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Name the container is addressed by
    pub container_name: String,

    /// Base image used when creating the container
    pub image: String,

    /// Working directory for every command
    pub workdir: String,

    /// Budget for a single test command
    pub command_timeout: Duration,

    /// Budget for each setup step (clone, installs)
    pub setup_timeout: Duration,

    /// Container CLI binary
    pub runtime_binary: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            container_name: "test-runner-sandbox".to_string(),
            image: "python:3.12".to_string(),
            workdir: "/workspace".to_string(),
            command_timeout: Duration::from_secs(300), // 5 minutes
            setup_timeout: Duration::from_secs(900),   // 15 minutes
            runtime_binary: "docker".to_string(),
        }
    }
}

impl SandboxConfig {
    /// Create a new configuration builder
    pub fn builder() -> SandboxConfigBuilder {
        SandboxConfigBuilder::default()
    }

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

        if let Some(name) = non_empty(env::NAME) {
            self.container_name = name;
        }
        if let Some(image) = non_empty(env::IMAGE) {
            self.image = image;
        }
        if let Some(workdir) = non_empty(env::WORKDIR) {
            self.workdir = workdir;
        }
        if let Some(runtime) = non_empty(env::RUNTIME) {
            self.runtime_binary = runtime;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !is_valid_container_name(&self.container_name) {
            return Err(SandboxError::Config(format!(
                "invalid container name: {:?}",
                self.container_name
            )));
        }

        if self.image.trim().is_empty() {
            return Err(SandboxError::Config("image must not be empty".to_string()));
        }

        if !self.workdir.starts_with('/') {
            return Err(SandboxError::Config(format!(
                "workdir must be an absolute path, got {:?}",
                self.workdir
            )));
        }

        if self.command_timeout.is_zero() || self.setup_timeout.is_zero() {
            return Err(SandboxError::Config(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        if self.runtime_binary.trim().is_empty() {
            return Err(SandboxError::Config(
                "runtime binary must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// The session identity described by this configuration
    pub fn session_spec(&self) -> SessionSpec {
        SessionSpec::new(&self.container_name, &self.image, &self.workdir)
    }
}

/// Container names accepted by the Docker CLI: `[a-zA-Z0-9][a-zA-Z0-9_.-]*`
fn is_valid_container_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        }
        _ => false,
    }
}

/// Builder for SandboxConfig
#[derive(Debug, Default)]
pub struct SandboxConfigBuilder {
    container_name: Option<String>,
    image: Option<String>,
    workdir: Option<String>,
    command_timeout: Option<Duration>,
    setup_timeout: Option<Duration>,
    runtime_binary: Option<String>,
}

impl SandboxConfigBuilder {
    /// Set the container name
    pub fn container_name(mut self, name: impl Into<String>) -> Self {
        self.container_name = Some(name.into());
        self
    }

    /// Set the base image
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the working directory
    pub fn workdir(mut self, workdir: impl Into<String>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    /// Set the per-command timeout
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    /// Set the per-setup-step timeout
    pub fn setup_timeout(mut self, timeout: Duration) -> Self {
        self.setup_timeout = Some(timeout);
        self
    }

    /// Set the container CLI binary
    pub fn runtime_binary(mut self, binary: impl Into<String>) -> Self {
        self.runtime_binary = Some(binary.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<SandboxConfig> {
        let defaults = SandboxConfig::default();
        let config = SandboxConfig {
            container_name: self.container_name.unwrap_or(defaults.container_name),
            image: self.image.unwrap_or(defaults.image),
            workdir: self.workdir.unwrap_or(defaults.workdir),
            command_timeout: self.command_timeout.unwrap_or(defaults.command_timeout),
            setup_timeout: self.setup_timeout.unwrap_or(defaults.setup_timeout),
            runtime_binary: self.runtime_binary.unwrap_or(defaults.runtime_binary),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SandboxConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.command_timeout, Duration::from_secs(300));
        assert_eq!(
            config.session_spec(),
            SessionSpec::new("test-runner-sandbox", "python:3.12", "/workspace")
        );
    }

    #[test]
    fn test_builder() {
        let config = SandboxConfig::builder()
            .container_name("ci-box")
            .image("python:3.11-bookworm")
            .command_timeout(Duration::from_secs(60))
            .runtime_binary("podman")
            .build()
            .unwrap();

        assert_eq!(config.container_name, "ci-box");
        assert_eq!(config.image, "python:3.11-bookworm");
        assert_eq!(config.command_timeout, Duration::from_secs(60));
        assert_eq!(config.runtime_binary, "podman");
        assert_eq!(config.workdir, "/workspace");
    }

    #[test]
    fn test_validation_errors() {
        assert!(SandboxConfig::builder().container_name("-bad").build().is_err());
        assert!(SandboxConfig::builder().container_name("has space").build().is_err());
        assert!(SandboxConfig::builder().workdir("relative/dir").build().is_err());
        assert!(
            SandboxConfig::builder()
                .command_timeout(Duration::ZERO)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_env_overrides() {
        let config = SandboxConfig::default().with_overrides_from(|key| match key {
            env::NAME => Some("override-box".to_string()),
            env::RUNTIME => Some("podman".to_string()),
            env::IMAGE => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(config.container_name, "override-box");
        assert_eq!(config.runtime_binary, "podman");
        assert_eq!(config.image, "python:3.12");
    }
}
