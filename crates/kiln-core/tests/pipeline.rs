//! Integration tests for the bundle pipeline.
//!
//! Subprocesses are faked: the installer points at a stub shell script and
//! the bundler adapter is an in-process stub, so the tests exercise
//! scaffolding, concurrency, publication and teardown without npm.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use kiln_core::bundler::{BackendFailure, BackendOutput, BundlerBackend, BundlerOrchestrator};
use kiln_core::{
    ArtifactStore, BackendKind, BundleRequest, DependencyInstaller, EphemeralProject, Error,
    FsStore, PipelineOptions, run_bundle_with,
};

/// Backend stub that "bundles" by echoing the project's entry component
/// source, so cross-request leakage would be visible in the artifact.
struct EchoBackend;

#[async_trait]
impl BundlerBackend for EchoBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Esbuild
    }

    async fn bundle(&self, project: &EphemeralProject) -> Result<BackendOutput, BackendFailure> {
        let app = tokio::fs::read_to_string(project.src_dir().join("App.tsx"))
            .await
            .map_err(|e| BackendFailure {
                message: format!("missing App.tsx: {}", e),
            })?;

        Ok(BackendOutput {
            html: None,
            script: format!("/* bundled */ {}", app),
            sourcemap: None,
        })
    }
}

fn fake_npm(dir: &Path, body: &str) -> PathBuf {
    let script = dir.join("fake-npm.sh");
    std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).expect("write fake npm");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("chmod fake npm");
    }
    script
}

fn request(id: &str, heading: &str) -> BundleRequest {
    let mut files = BTreeMap::new();
    files.insert(
        "App.tsx".to_string(),
        format!(
            "export default function App() {{ return <h1 className=\"text-xl\">{}</h1>; }}",
            heading
        ),
    );

    BundleRequest {
        id: id.to_string(),
        files,
        dependencies: BTreeMap::new(),
        base_config: r#"module.exports = { darkMode: "class", content: [] };"#.to_string(),
        custom_config: None,
        base_css: "@tailwind base;\n@tailwind utilities;\n".to_string(),
        custom_css: None,
        backend: None,
        entry: None,
    }
}

struct Harness {
    _temp: TempDir,
    options: PipelineOptions,
    store: FsStore,
    installer: DependencyInstaller,
    orchestrator: BundlerOrchestrator,
}

impl Harness {
    fn new() -> Self {
        let temp = TempDir::new().expect("temp dir");
        let workdir = temp.path().join("work");
        let store = FsStore::new(temp.path().join("store"), "/static");
        let npm = fake_npm(temp.path(), "exit 0");

        Self {
            options: PipelineOptions {
                workdir,
                auto_fallback: false,
                install_timeout: Duration::from_secs(5),
                bundle_timeout: Duration::from_secs(5),
            },
            store,
            installer: DependencyInstaller::with_npm_path(npm, Duration::from_secs(5)),
            orchestrator: BundlerOrchestrator::with_backends(Box::new(EchoBackend), None),
            _temp: temp,
        }
    }

    fn leftover_projects(&self) -> usize {
        match std::fs::read_dir(&self.options.workdir) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

#[tokio::test]
async fn test_end_to_end_publishes_all_artifacts() {
    let harness = Harness::new();
    let req = request("hello-page", "Hello");

    let outcome = run_bundle_with(
        &req,
        &harness.store,
        &harness.options,
        &harness.installer,
        &harness.orchestrator,
    )
    .await
    .expect("pipeline should succeed");

    assert_eq!(outcome.id, "hello-page");
    assert_eq!(outcome.backend, BackendKind::Esbuild);
    assert_eq!(outcome.html_url, "/static/hello-page.html");
    assert!(!outcome.style_fell_back);

    // Published page references the stored assets by URL.
    let page = harness.store.load_page("hello-page").await.unwrap().unwrap();
    assert!(page.contains(r#"<script src="/static/hello-page.js"></script>"#));
    assert!(page.contains(r#"<link rel="stylesheet" href="/static/hello-page.css">"#));

    // The stylesheet contains a generated rule for the used utility class.
    let css = harness.store.load_static("hello-page.css").await.unwrap().unwrap();
    let css = String::from_utf8(css).unwrap();
    assert!(css.contains(".text-xl"));
    assert!(css.contains("font-size: 1.25rem"));

    // The script is the bundle the backend produced.
    let script = harness.store.load_static("hello-page.js").await.unwrap().unwrap();
    assert!(String::from_utf8(script).unwrap().contains("Hello"));
}

#[tokio::test]
async fn test_cleanup_after_success() {
    let harness = Harness::new();
    let req = request("clean-ok", "Hi");

    run_bundle_with(
        &req,
        &harness.store,
        &harness.options,
        &harness.installer,
        &harness.orchestrator,
    )
    .await
    .expect("pipeline should succeed");

    assert_eq!(harness.leftover_projects(), 0);
}

#[tokio::test]
async fn test_cleanup_after_install_failure() {
    let mut harness = Harness::new();
    let npm = fake_npm(harness._temp.path(), "echo 'E404 not found' >&2; exit 1");
    harness.installer = DependencyInstaller::with_npm_path(npm, Duration::from_secs(5));

    let req = request("clean-fail", "Hi");
    let result = run_bundle_with(
        &req,
        &harness.store,
        &harness.options,
        &harness.installer,
        &harness.orchestrator,
    )
    .await;

    match result {
        Err(Error::DependencyInstall { log }) => assert!(log.contains("E404 not found")),
        other => panic!("expected DependencyInstall error, got {:?}", other.map(|o| o.id)),
    }

    // The ephemeral project must be gone even though the request failed.
    assert_eq!(harness.leftover_projects(), 0);
}

#[tokio::test]
async fn test_invalid_id_short_circuits_without_side_effects() {
    let harness = Harness::new();
    let req = request("../escape", "Hi");

    let result = run_bundle_with(
        &req,
        &harness.store,
        &harness.options,
        &harness.installer,
        &harness.orchestrator,
    )
    .await;

    assert!(matches!(result, Err(Error::InvalidIdentifier(_))));
    // No workdir was created, nothing was stored.
    assert!(!harness.options.workdir.exists());
}

#[tokio::test]
async fn test_concurrent_requests_do_not_leak_across_artifacts() {
    let harness = Harness::new();

    // Same source path, different content, different ids.
    let req_a = request("iso-a", "AlphaContent");
    let req_b = request("iso-b", "BetaContent");

    let (a, b) = tokio::join!(
        run_bundle_with(
            &req_a,
            &harness.store,
            &harness.options,
            &harness.installer,
            &harness.orchestrator,
        ),
        run_bundle_with(
            &req_b,
            &harness.store,
            &harness.options,
            &harness.installer,
            &harness.orchestrator,
        ),
    );
    a.expect("request a should succeed");
    b.expect("request b should succeed");

    let script_a = String::from_utf8(
        harness.store.load_static("iso-a.js").await.unwrap().unwrap(),
    )
    .unwrap();
    let script_b = String::from_utf8(
        harness.store.load_static("iso-b.js").await.unwrap().unwrap(),
    )
    .unwrap();

    assert!(script_a.contains("AlphaContent") && !script_a.contains("BetaContent"));
    assert!(script_b.contains("BetaContent") && !script_b.contains("AlphaContent"));

    assert_eq!(harness.leftover_projects(), 0);
}

#[tokio::test]
async fn test_repeated_page_loads_are_identical() {
    let harness = Harness::new();
    let req = request("stable-page", "Hi");

    run_bundle_with(
        &req,
        &harness.store,
        &harness.options,
        &harness.installer,
        &harness.orchestrator,
    )
    .await
    .expect("pipeline should succeed");

    let first = harness.store.load_page("stable-page").await.unwrap().unwrap();
    let second = harness.store.load_page("stable-page").await.unwrap().unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_malformed_override_still_bundles() {
    let harness = Harness::new();
    let mut req = request("override-broken", "Hi");
    req.custom_config = Some("definitely not a config {{{".to_string());

    let outcome = run_bundle_with(
        &req,
        &harness.store,
        &harness.options,
        &harness.installer,
        &harness.orchestrator,
    )
    .await
    .expect("override failure must not fail the request");

    assert!(outcome.style_fell_back);
    let css = harness
        .store
        .load_static("override-broken.css")
        .await
        .unwrap()
        .unwrap();
    assert!(!css.is_empty());
}
