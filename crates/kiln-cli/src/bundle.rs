//! One-shot bundle command.
//!
//! Runs a single request file through the full pipeline and writes the
//! artifacts under the output directory; the published page references
//! its sibling assets relatively so it opens straight from disk.

use std::path::Path;

use anyhow::Context;

use kiln_core::{BundleRequest, FsStore, PipelineOptions, run_bundle};

use crate::colors;

pub async fn execute(request_path: &str, output_dir: &str, fallback: bool) -> anyhow::Result<()> {
    let path = Path::new(request_path);
    if !path.exists() {
        anyhow::bail!("Request file not found: {}", request_path);
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", request_path))?;
    let request: BundleRequest =
        serde_json::from_str(&raw).with_context(|| format!("Invalid request in {}", request_path))?;

    // Relative public base: the page sits next to its assets on disk.
    let store = FsStore::new(output_dir, ".");

    let mut options = PipelineOptions::default();
    options.auto_fallback = fallback;

    let outcome = run_bundle(&request, &store, &options).await?;

    println!(
        "{}✓ Bundled{} {} with {}",
        colors::GREEN,
        colors::RESET,
        outcome.id,
        outcome.backend
    );
    if outcome.style_fell_back {
        println!("  (override style config was dropped, base config used)");
    }
    println!(
        "  {}→{} {}/bundled/{}.html",
        colors::CYAN,
        colors::RESET,
        output_dir.trim_end_matches('/'),
        outcome.id
    );

    Ok(())
}
