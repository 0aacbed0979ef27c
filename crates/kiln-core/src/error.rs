//! Error types for kiln-core.

use thiserror::Error;

/// Result type for kiln-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the bundle pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Artifact identifier failed validation.
    #[error("invalid identifier: {0:?} (expected [A-Za-z0-9_-]+)")]
    InvalidIdentifier(String),

    /// A required request field is missing or malformed.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Dependency installation failed. Carries the installer's captured
    /// diagnostic stream verbatim.
    #[error("dependency install failed:\n{log}")]
    DependencyInstall { log: String },

    /// A bundler backend failed and no fallback succeeded.
    #[error("bundler {backend} failed: {message}")]
    Bundler { backend: &'static str, message: String },

    /// CSS generation failed on the base-only path. Override failures are
    /// absorbed by the fallback cascade and never reach here.
    #[error("css generation failed: {0}")]
    Css(String),

    /// Durable storage save/load failed (transport-level, not a miss).
    #[error("storage error: {0}")]
    Storage(String),

    /// A subprocess outlived its wall-clock budget.
    #[error("{stage} timed out after {secs}s")]
    Timeout { stage: &'static str, secs: u64 },

    /// Required external tool not found on PATH.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
