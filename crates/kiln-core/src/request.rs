//! Bundle request model and identifier validation.
//!
//! A [`BundleRequest`] is one call asking the pipeline to compile a set of
//! source files plus a base/override style configuration pair into a
//! deployable artifact published under a caller-chosen identifier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default entry component file, relative to the source root.
pub const DEFAULT_ENTRY: &str = "App.tsx";

/// Backend selector for the bundler orchestrator.
///
/// `Esbuild` favors speed and a single-file HTML output; `Webpack` favors
/// broader plugin/ecosystem compatibility and explicit multi-file output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Esbuild,
    Webpack,
}

impl BackendKind {
    /// Stable name used in logs, artifact tags and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Esbuild => "esbuild",
            BackendKind::Webpack => "webpack",
        }
    }

    /// The alternate backend, used when automatic fallback is configured.
    pub fn fallback(&self) -> BackendKind {
        match self {
            BackendKind::Esbuild => BackendKind::Webpack,
            BackendKind::Webpack => BackendKind::Esbuild,
        }
    }
}

impl Default for BackendKind {
    fn default() -> Self {
        BackendKind::Esbuild
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call into the bundle pipeline.
///
/// `files` maps project-relative paths to source text; paths land under the
/// fixed `src/` root at scaffold time. `dependencies` is merged over the
/// fixed default set, caller entries winning on name collision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleRequest {
    /// Caller-chosen artifact identifier. Must match `^[A-Za-z0-9_-]+$`.
    pub id: String,

    /// Source files, keyed by relative path (e.g. `App.tsx`,
    /// `components/Button.tsx`).
    pub files: BTreeMap<String, String>,

    /// Additional package dependencies (name -> version range).
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Base style configuration source. Required and trusted.
    pub base_config: String,

    /// Caller-supplied override configuration source. Untrusted; may
    /// contain function literals.
    #[serde(default)]
    pub custom_config: Option<String>,

    /// Base global stylesheet.
    pub base_css: String,

    /// Caller-supplied override stylesheet.
    #[serde(default)]
    pub custom_css: Option<String>,

    /// Bundler backend selector. Defaults to esbuild.
    #[serde(default)]
    pub backend: Option<BackendKind>,

    /// Top-level component file to mount. Defaults to `App.tsx`.
    #[serde(default)]
    pub entry: Option<String>,
}

impl BundleRequest {
    /// The entry component path, relative to the source root.
    pub fn entry_file(&self) -> &str {
        self.entry.as_deref().unwrap_or(DEFAULT_ENTRY)
    }

    /// The selected backend, defaulting to esbuild.
    pub fn backend(&self) -> BackendKind {
        self.backend.unwrap_or_default()
    }

    /// Validate the request before any side effect.
    ///
    /// Checks the identifier, requires at least one source file, and
    /// requires the entry component to be among the submitted sources.
    pub fn validate(&self) -> Result<()> {
        validate_identifier(&self.id)?;

        if self.files.is_empty() {
            return Err(Error::Validation("no source files provided".to_string()));
        }

        let entry = self.entry_file();
        if !self.files.contains_key(entry) {
            return Err(Error::Validation(format!(
                "entry component {:?} not found among submitted files",
                entry
            )));
        }

        if self.base_config.trim().is_empty() {
            return Err(Error::Validation("base_config must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Validate an artifact identifier against `^[A-Za-z0-9_-]+$`.
///
/// Runs before any storage key construction or filesystem write. An invalid
/// identifier short-circuits the request with no side effects.
pub fn validate_identifier(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidIdentifier(id.to_string()));
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::InvalidIdentifier(id.to_string()));
    }

    Ok(())
}
