//! esbuild backend adapter.
//!
//! The fast personality: one `npx esbuild` pass over the generated entry
//! module, bundle read back from disk, plus a self-contained HTML document
//! with the script (and any emitted stylesheet) inlined.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::project::EphemeralProject;
use crate::request::BackendKind;
use crate::scaffold::ROOT_ELEMENT_ID;

use super::{BackendFailure, BackendOutput, BundlerBackend, read_output_file, run_tool};

pub struct EsbuildBackend {
    npx_path: PathBuf,
    timeout: Duration,
}

impl EsbuildBackend {
    pub fn new(npx_path: PathBuf, timeout: Duration) -> Self {
        Self { npx_path, timeout }
    }

    /// Arguments for one esbuild invocation, relative to the project root.
    fn args(&self) -> Vec<String> {
        vec![
            "esbuild".to_string(),
            "src/main.jsx".to_string(),
            "--bundle".to_string(),
            "--outfile=dist/bundle.js".to_string(),
            "--jsx=automatic".to_string(),
            "--loader:.js=jsx".to_string(),
            "--alias:next=./shims/next".to_string(),
            "--define:process.env.NODE_ENV=\"production\"".to_string(),
            "--minify".to_string(),
            "--log-level=warning".to_string(),
        ]
    }
}

#[async_trait]
impl BundlerBackend for EsbuildBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Esbuild
    }

    async fn bundle(
        &self,
        project: &EphemeralProject,
    ) -> Result<BackendOutput, BackendFailure> {
        let mut command = Command::new(&self.npx_path);
        command.current_dir(project.root()).args(self.args());

        let output = run_tool(command, self.timeout, "esbuild").await?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!(id = %project.id(), "esbuild diagnostics:\n{}", stderr);
        }

        let script = read_output_file(&project.out_dir().join("bundle.js"), "esbuild").await?;

        // Importing globals.css makes esbuild emit a sibling stylesheet.
        let stylesheet = tokio::fs::read_to_string(project.out_dir().join("bundle.css"))
            .await
            .ok();

        let html = self_contained_html(&script, stylesheet.as_deref());

        Ok(BackendOutput {
            html: Some(html),
            script,
            sourcemap: None,
        })
    }
}

/// Compose the single-file HTML document this personality is known for.
fn self_contained_html(script: &str, stylesheet: Option<&str>) -> String {
    let style_block = stylesheet
        .map(|css| format!("  <style>\n{}\n  </style>\n", css))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
{style_block}</head>
<body>
  <div id="{ROOT_ELEMENT_ID}"></div>
  <script>
{script}
  </script>
</body>
</html>
"#
    )
}
