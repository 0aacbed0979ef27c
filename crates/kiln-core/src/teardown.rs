//! Ephemeral project teardown.
//!
//! Removal must happen exactly once on every exit path: normal return,
//! a domain error propagating out, or a panic mid-pipeline. The guard is
//! armed at project creation; [`TeardownGuard::finish`] performs the
//! normal async removal, and `Drop` is the last resort for unwinds and
//! cancelled futures. Removal errors are logged and swallowed so a
//! cleanup failure never masks the original outcome.

use std::path::PathBuf;

use crate::project::EphemeralProject;

/// Guarantees removal of one ephemeral project directory.
#[derive(Debug)]
pub struct TeardownGuard {
    root: PathBuf,
    id: String,
    armed: bool,
}

impl TeardownGuard {
    /// Arm a guard for the given project.
    pub fn new(project: &EphemeralProject) -> Self {
        Self {
            root: project.root().to_path_buf(),
            id: project.id().to_string(),
            armed: true,
        }
    }

    /// Remove the project tree. Consumes the guard, so removal cannot run
    /// twice; errors are logged, never propagated.
    pub async fn finish(mut self) {
        self.armed = false;

        if let Err(e) = tokio::fs::remove_dir_all(&self.root).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    id = %self.id,
                    "failed to remove ephemeral project {}: {}",
                    self.root.display(),
                    e
                );
            }
        } else {
            tracing::debug!(id = %self.id, "removed ephemeral project {}", self.root.display());
        }
    }
}

impl Drop for TeardownGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        // Unwind or cancellation path: blocking removal is acceptable,
        // losing the directory is not.
        if let Err(e) = std::fs::remove_dir_all(&self.root) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    id = %self.id,
                    "teardown on drop failed for {}: {}",
                    self.root.display(),
                    e
                );
            }
        }
    }
}
