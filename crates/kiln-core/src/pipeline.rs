//! End-to-end bundle pipeline.
//!
//! Drives one request through scaffold → install → (style generation
//! concurrent with bundling) → publish, inside the teardown guard so the
//! ephemeral project is removed on every exit path.

use std::path::PathBuf;
use std::time::Duration;

use crate::bundler::BundlerOrchestrator;
use crate::error::{Error, Result};
use crate::install::DependencyInstaller;
use crate::project::EphemeralProject;
use crate::request::{BackendKind, BundleRequest};
use crate::scaffold::{self, ROOT_ELEMENT_ID, combined_global_css};
use crate::store::{ArtifactStore, CompiledArtifact};
use crate::style::StyleCompiler;
use crate::teardown::TeardownGuard;

/// Knobs for one pipeline instance. Injected rather than global so tests
/// can point everything at a scratch directory.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory ephemeral projects are created under.
    pub workdir: PathBuf,

    /// Whether a failed primary backend retries with the alternate one.
    pub auto_fallback: bool,

    /// Wall-clock budget for dependency installation.
    pub install_timeout: Duration,

    /// Wall-clock budget per bundler attempt.
    pub bundle_timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workdir: std::env::temp_dir().join("kiln"),
            auto_fallback: false,
            install_timeout: DependencyInstaller::DEFAULT_TIMEOUT,
            bundle_timeout: BundlerOrchestrator::DEFAULT_TIMEOUT,
        }
    }
}

/// Result of one successful bundle request.
#[derive(Debug, Clone)]
pub struct BundleOutcome {
    pub id: String,

    /// Public URL of the published HTML document.
    pub html_url: String,

    /// Which backend produced the script.
    pub backend: BackendKind,

    /// Whether the style compiler dropped the override configuration.
    pub style_fell_back: bool,
}

/// Run the full pipeline for one request.
pub async fn run_bundle(
    request: &BundleRequest,
    store: &dyn ArtifactStore,
    options: &PipelineOptions,
) -> Result<BundleOutcome> {
    // Validation short-circuits before tool discovery or any side effect.
    request.validate()?;

    let installer = DependencyInstaller::new(options.install_timeout)?;
    let orchestrator = BundlerOrchestrator::new(
        request.backend(),
        options.auto_fallback,
        options.bundle_timeout,
    )?;

    run_bundle_with(request, store, options, &installer, &orchestrator).await
}

/// Run the pipeline with explicit installer and orchestrator instances.
/// The injection point for tests and for callers that reuse tooling
/// across requests.
pub async fn run_bundle_with(
    request: &BundleRequest,
    store: &dyn ArtifactStore,
    options: &PipelineOptions,
    installer: &DependencyInstaller,
    orchestrator: &BundlerOrchestrator,
) -> Result<BundleOutcome> {
    request.validate()?;

    let compiler = StyleCompiler::new();
    let prepared = compiler.prepare(&request.base_config, request.custom_config.as_deref())?;
    if prepared.override_dropped() {
        tracing::warn!(id = %request.id, "override config dropped, continuing with base config");
    }

    tokio::fs::create_dir_all(&options.workdir).await?;
    let project = EphemeralProject::create(&options.workdir, &request.id).await?;
    let guard = TeardownGuard::new(&project);

    let result = execute(
        request,
        store,
        &project,
        installer,
        orchestrator,
        compiler,
        prepared,
    )
    .await;

    // Unconditional, and exactly once: the guard also covers panics via
    // its Drop, but the normal path removes the tree here.
    guard.finish().await;

    result
}

async fn execute(
    request: &BundleRequest,
    store: &dyn ArtifactStore,
    project: &EphemeralProject,
    installer: &DependencyInstaller,
    orchestrator: &BundlerOrchestrator,
    compiler: StyleCompiler,
    prepared: crate::style::PreparedConfig,
) -> Result<BundleOutcome> {
    scaffold::scaffold(project, request, &prepared.config_source()).await?;
    installer.install(project).await?;

    // CSS generation is pure CPU work; run it off the reactor, joined
    // concurrently with the bundler subprocess.
    let content: Vec<String> = request.files.values().cloned().collect();
    let stylesheet = combined_global_css(request);
    let style_task = tokio::task::spawn_blocking(move || {
        let refs: Vec<&str> = content.iter().map(|s| s.as_str()).collect();
        compiler.generate(&prepared, &refs, &stylesheet)
    });

    let style_future = async {
        match style_task.await {
            Ok(result) => result,
            Err(e) => Err(Error::Css(format!("style generation task failed: {}", e))),
        }
    };

    let (style, bundle) = tokio::try_join!(style_future, orchestrator.run(project))?;

    if let Some(sourcemap) = &bundle.output.sourcemap {
        tracing::debug!(
            id = %request.id,
            "backend emitted a sourcemap ({} bytes, not published)",
            sourcemap.len()
        );
    }

    let script_url = store.public_url(&format!("{}.js", request.id));
    let stylesheet_url = store.public_url(&format!("{}.css", request.id));
    let html = compose_page(&request.id, &script_url, &stylesheet_url);

    let artifact = CompiledArtifact {
        html,
        script: bundle.output.script,
        stylesheet: style.css,
        backend: bundle.backend,
    };

    let html_url = store.save_bundle(&request.id, &artifact).await?;

    tracing::info!(
        id = %request.id,
        backend = bundle.backend.as_str(),
        fallback = style.used_fallback,
        "bundle published at {}",
        html_url
    );

    Ok(BundleOutcome {
        id: request.id.clone(),
        html_url,
        backend: bundle.backend,
        style_fell_back: style.used_fallback,
    })
}

/// Compose the published HTML document, linking the stored script and
/// stylesheet by URL.
fn compose_page(id: &str, script_url: &str, stylesheet_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{id}</title>
  <link rel="stylesheet" href="{stylesheet_url}">
</head>
<body>
  <div id="{ROOT_ELEMENT_ID}"></div>
  <script src="{script_url}"></script>
</body>
</html>
"#
    )
}
