use crate::domain::launch::LaunchConfig;
use crate::domain::ports::DebugLauncher;
use anyhow::{Context as _, Result, bail};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

/// Runs a headless Delve server for the launch configuration and waits for
/// it to exit.
pub struct DelveLauncher {
    dlv_path: String,
    listen: String,
}

impl DelveLauncher {
    pub fn new(dlv_path: impl Into<String>, listen: impl Into<String>) -> Self {
        Self {
            dlv_path: dlv_path.into(),
            listen: listen.into(),
        }
    }

    pub fn command(&self, config: &LaunchConfig) -> Command {
        let mut cmd = Command::new(&self.dlv_path);
        cmd.arg(&config.mode)
            .arg(&config.program)
            .arg("--headless")
            .arg(format!("--listen={}", self.listen))
            .arg("--api-version=2")
            .current_dir(&config.program)
            .envs(&config.env);
        cmd
    }
}

#[async_trait]
impl DebugLauncher for DelveLauncher {
    async fn launch(&self, config: &LaunchConfig) -> Result<()> {
        info!(
            program = %config.program.display(),
            listen = %self.listen,
            vars = config.env.len(),
            "starting delve"
        );
        let status = self
            .command(config)
            .status()
            .await
            .with_context(|| format!("Failed to start {}", self.dlv_path))?;
        if !status.success() {
            bail!("{} exited with {}", self.dlv_path, status);
        }
        Ok(())
    }
}
