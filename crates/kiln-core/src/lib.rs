//! Core engine for the kiln bundle pipeline.
//!
//! This crate provides:
//! - Ephemeral project scaffolding (manifest, sources, shims, entry)
//! - Dependency installation with captured diagnostics
//! - Style compilation (config merge, fallback cascade, utility CSS)
//! - Bundler backend orchestration (esbuild / webpack adapters)
//! - Identifier-keyed artifact storage
//! - Guaranteed teardown of ephemeral state
//!
//! # Architecture
//!
//! ```text
//! BundleRequest
//!     │
//!     ├── StyleCompiler::prepare ──► merged config program
//!     │
//!     ├── ProjectScaffolder ──► <workdir>/<id>-<suffix>/
//!     │
//!     ├── DependencyInstaller ──► npm install (stderr captured)
//!     │
//!     ├── StyleCompiler::generate ──┐ (concurrent)
//!     ├── BundlerOrchestrator ──────┤
//!     │                             ▼
//!     └── ArtifactStore ──► bundled/<id>.{html,js,css}
//!
//! TeardownGuard removes the project tree on every exit path.
//! ```

pub mod bundler;
pub mod error;
pub mod install;
pub mod pipeline;
pub mod project;
pub mod request;
pub mod scaffold;
pub mod store;
pub mod style;
pub mod teardown;

pub use bundler::{
    BackendFailure, BackendOutput, BundleOutput, BundlerBackend, BundlerOrchestrator,
    EsbuildBackend, WebpackBackend,
};
pub use error::{Error, Result};
pub use install::DependencyInstaller;
pub use pipeline::{BundleOutcome, PipelineOptions, run_bundle, run_bundle_with};
pub use project::EphemeralProject;
pub use request::{BackendKind, BundleRequest, validate_identifier};
pub use store::{ArtifactStore, CompiledArtifact, FsStore, bundle_key, validate_static_filename};
pub use style::{StyleArtifacts, StyleCompiler, strip_import_lines};
pub use teardown::TeardownGuard;
