//! Dependency installation for ephemeral projects.
//!
//! Runs the package manager inside the project directory, captures its
//! diagnostic stream in full, and fails hard with that captured text:
//! it is the only signal the caller has for diagnosing a bad dependency
//! declaration.

use std::path::PathBuf;
use std::time::Duration;

use tokio::process::Command;

use crate::error::{Error, Result};
use crate::project::EphemeralProject;

/// Runs `npm install` against an ephemeral project.
#[derive(Debug, Clone)]
pub struct DependencyInstaller {
    /// Resolved npm binary path.
    npm_path: PathBuf,

    /// Wall-clock budget for one install run.
    timeout: Duration,
}

impl DependencyInstaller {
    /// Default install budget.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    /// Create an installer, discovering `npm` on PATH.
    pub fn new(timeout: Duration) -> Result<Self> {
        let npm_path = which::which("npm")
            .map_err(|_| Error::ToolNotFound("npm not found in PATH".to_string()))?;

        Ok(Self { npm_path, timeout })
    }

    /// Create an installer with an explicit npm path (used by tests).
    pub fn with_npm_path(npm_path: PathBuf, timeout: Duration) -> Self {
        Self { npm_path, timeout }
    }

    /// Install the project's declared dependencies.
    ///
    /// Suspends until the subprocess exits. A non-zero exit status is a
    /// hard failure carrying the captured stderr verbatim; exceeding the
    /// wall-clock budget kills the subprocess and fails with
    /// [`Error::Timeout`].
    pub async fn install(&self, project: &EphemeralProject) -> Result<()> {
        tracing::info!(id = %project.id(), "installing dependencies");

        let mut command = Command::new(&self.npm_path);
        command
            .current_dir(project.root())
            .args(["install", "--no-audit", "--no-fund", "--loglevel=error"])
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| Error::Timeout {
                stage: "dependency install",
                secs: self.timeout.as_secs(),
            })??;

        if !output.status.success() {
            let log = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::warn!(
                id = %project.id(),
                "npm install exited with {}",
                output.status
            );
            return Err(Error::DependencyInstall { log });
        }

        tracing::debug!(id = %project.id(), "dependencies installed");
        Ok(())
    }
}
