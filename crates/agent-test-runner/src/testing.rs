//! Container runtime double for tests

use agent_sandbox::{CommandOutput, ContainerRuntime, Result, SessionSpec};
use async_trait::async_trait;
use mockall::mock;
use std::time::Duration;

mock! {
    pub Runtime {}

    #[async_trait]
    impl ContainerRuntime for Runtime {
        async fn inspect(&self, name: &str) -> Result<bool>;
        async fn create(&self, spec: &SessionSpec) -> Result<()>;
        async fn exec(
            &self,
            name: &str,
            workdir: &str,
            command: &str,
            timeout: Duration,
        ) -> Result<CommandOutput>;
    }
}
