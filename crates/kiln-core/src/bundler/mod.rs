//! Bundler backend orchestration.
//!
//! Two interchangeable backend personalities exist: esbuild favors speed
//! and a self-contained single-file HTML output; webpack favors broader
//! plugin/ecosystem compatibility and explicit multi-file output (script +
//! sourcemap) read back from disk. Every adapter normalizes its native
//! output into one [`BackendOutput`] shape and returns failure values
//! across the boundary, never panicking. The orchestrator tries exactly the
//! selected backend, and retries once with the alternate backend when
//! automatic fallback is configured.

mod esbuild;
mod webpack;

pub use esbuild::EsbuildBackend;
pub use webpack::{WebpackBackend, generate_webpack_config};

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::project::EphemeralProject;
use crate::request::BackendKind;

/// Uniform result shape every backend normalizes into.
#[derive(Debug, Clone, Default)]
pub struct BackendOutput {
    /// Self-contained HTML document, for backends that produce one.
    pub html: Option<String>,

    /// The script bundle.
    pub script: String,

    /// Source map, for backends that emit one.
    pub sourcemap: Option<String>,
}

/// Failure value returned across the adapter boundary.
#[derive(Debug, Clone)]
pub struct BackendFailure {
    pub message: String,
}

impl BackendFailure {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One pluggable build-backend adapter.
#[async_trait]
pub trait BundlerBackend: Send + Sync {
    /// Which personality this adapter implements.
    fn kind(&self) -> BackendKind;

    /// Produce a bundle from the scaffolded project. Output is read back
    /// from the filesystem, since success/output shape differs per tool.
    async fn bundle(
        &self,
        project: &EphemeralProject,
    ) -> std::result::Result<BackendOutput, BackendFailure>;
}

/// Successful orchestration result: the normalized output plus a tag for
/// the backend that produced it.
#[derive(Debug, Clone)]
pub struct BundleOutput {
    pub output: BackendOutput,
    pub backend: BackendKind,
}

/// Drives exactly one backend, with optional one-shot fallback to the
/// alternate personality.
pub struct BundlerOrchestrator {
    primary: Box<dyn BundlerBackend>,
    fallback: Option<Box<dyn BundlerBackend>>,
}

impl BundlerOrchestrator {
    /// Default bundling budget per backend attempt.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

    /// Create an orchestrator for the selected backend, discovering `npx`
    /// on PATH once for both adapters.
    pub fn new(selected: BackendKind, auto_fallback: bool, timeout: Duration) -> Result<Self> {
        let npx_path = which::which("npx")
            .map_err(|_| Error::ToolNotFound("npx not found in PATH".to_string()))?;

        let primary = make_backend(selected, npx_path.clone(), timeout);
        let fallback =
            auto_fallback.then(|| make_backend(selected.fallback(), npx_path, timeout));

        Ok(Self { primary, fallback })
    }

    /// Create an orchestrator from explicit adapters (used by tests).
    pub fn with_backends(
        primary: Box<dyn BundlerBackend>,
        fallback: Option<Box<dyn BundlerBackend>>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// Run the selected backend against the project, falling back once if
    /// configured. The same inputs are handed to the fallback backend.
    pub async fn run(&self, project: &EphemeralProject) -> Result<BundleOutput> {
        let primary_kind = self.primary.kind();

        match self.primary.bundle(project).await {
            Ok(output) => {
                return Ok(BundleOutput {
                    output,
                    backend: primary_kind,
                });
            }
            Err(failure) => {
                tracing::warn!(
                    backend = primary_kind.as_str(),
                    "bundler backend failed: {}",
                    failure.message
                );

                let Some(fallback) = &self.fallback else {
                    return Err(Error::Bundler {
                        backend: primary_kind.as_str(),
                        message: failure.message,
                    });
                };

                tracing::info!(
                    backend = fallback.kind().as_str(),
                    "retrying with fallback backend"
                );

                match fallback.bundle(project).await {
                    Ok(output) => Ok(BundleOutput {
                        output,
                        backend: fallback.kind(),
                    }),
                    Err(failure) => Err(Error::Bundler {
                        backend: fallback.kind().as_str(),
                        message: failure.message,
                    }),
                }
            }
        }
    }
}

fn make_backend(kind: BackendKind, npx_path: PathBuf, timeout: Duration) -> Box<dyn BundlerBackend> {
    match kind {
        BackendKind::Esbuild => Box::new(EsbuildBackend::new(npx_path, timeout)),
        BackendKind::Webpack => Box::new(WebpackBackend::new(npx_path, timeout)),
    }
}

/// Run a build tool to completion, capturing output, under a wall-clock
/// budget. Failures (spawn errors, timeouts, non-zero exits) come back
/// as values so adapters stay panic-free across the boundary.
async fn run_tool(
    mut command: Command,
    timeout: Duration,
    label: &str,
) -> std::result::Result<std::process::Output, BackendFailure> {
    command.kill_on_drop(true);

    let output = tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| BackendFailure::new(format!("{} timed out after {}s", label, timeout.as_secs())))?
        .map_err(|e| BackendFailure::new(format!("failed to spawn {}: {}", label, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BackendFailure::new(format!(
            "{} exited with {}:\n{}",
            label, output.status, stderr
        )));
    }

    Ok(output)
}

/// Read a tool's on-disk output file, translating IO failure into a
/// backend failure value.
async fn read_output_file(
    path: &std::path::Path,
    label: &str,
) -> std::result::Result<String, BackendFailure> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        BackendFailure::new(format!(
            "{} produced no {} ({}): {}",
            label,
            path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
            path.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct StubBackend {
        kind: BackendKind,
        result: std::result::Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl BundlerBackend for StubBackend {
        fn kind(&self) -> BackendKind {
            self.kind
        }

        async fn bundle(
            &self,
            _project: &EphemeralProject,
        ) -> std::result::Result<BackendOutput, BackendFailure> {
            match self.result {
                Ok(script) => Ok(BackendOutput {
                    html: None,
                    script: script.to_string(),
                    sourcemap: None,
                }),
                Err(message) => Err(BackendFailure::new(message)),
            }
        }
    }

    async fn project() -> (TempDir, EphemeralProject) {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let project = EphemeralProject::create(temp.path(), "orch-test")
            .await
            .expect("Failed to create project");
        (temp, project)
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let (_temp, project) = project().await;

        let orchestrator = BundlerOrchestrator::with_backends(
            Box::new(StubBackend {
                kind: BackendKind::Esbuild,
                result: Ok("primary-bundle"),
            }),
            Some(Box::new(StubBackend {
                kind: BackendKind::Webpack,
                result: Ok("fallback-bundle"),
            })),
        );

        let out = orchestrator.run(&project).await.expect("should succeed");
        assert_eq!(out.backend, BackendKind::Esbuild);
        assert_eq!(out.output.script, "primary-bundle");
    }

    #[tokio::test]
    async fn test_fallback_runs_on_primary_failure() {
        let (_temp, project) = project().await;

        let orchestrator = BundlerOrchestrator::with_backends(
            Box::new(StubBackend {
                kind: BackendKind::Esbuild,
                result: Err("primary exploded"),
            }),
            Some(Box::new(StubBackend {
                kind: BackendKind::Webpack,
                result: Ok("fallback-bundle"),
            })),
        );

        let out = orchestrator.run(&project).await.expect("fallback should succeed");
        assert_eq!(out.backend, BackendKind::Webpack);
        assert_eq!(out.output.script, "fallback-bundle");
    }

    #[tokio::test]
    async fn test_no_fallback_surfaces_primary_failure() {
        let (_temp, project) = project().await;

        let orchestrator = BundlerOrchestrator::with_backends(
            Box::new(StubBackend {
                kind: BackendKind::Esbuild,
                result: Err("primary exploded"),
            }),
            None,
        );

        match orchestrator.run(&project).await {
            Err(Error::Bundler { backend, message }) => {
                assert_eq!(backend, "esbuild");
                assert!(message.contains("primary exploded"));
            }
            other => panic!("expected Bundler error, got {:?}", other.map(|o| o.backend)),
        }
    }

    #[tokio::test]
    async fn test_both_failing_reports_fallback_backend() {
        let (_temp, project) = project().await;

        let orchestrator = BundlerOrchestrator::with_backends(
            Box::new(StubBackend {
                kind: BackendKind::Esbuild,
                result: Err("first"),
            }),
            Some(Box::new(StubBackend {
                kind: BackendKind::Webpack,
                result: Err("second"),
            })),
        );

        match orchestrator.run(&project).await {
            Err(Error::Bundler { backend, message }) => {
                assert_eq!(backend, "webpack");
                assert!(message.contains("second"));
            }
            other => panic!("expected Bundler error, got {:?}", other.map(|o| o.backend)),
        }
    }
}
