//! Ephemeral project scaffolding.
//!
//! Materializes a bundle request into its project directory:
//! - Dependency manifest (default set merged with caller declarations)
//! - Caller sources under the fixed `src/` root
//! - Framework compatibility shims shadowing the `next` package
//! - Synthetic entry module mounting the caller's top component
//! - Style configuration file and global stylesheet
//!
//! Any write failure aborts scaffolding; the teardown guard owns removal
//! of the partially written tree.

mod entry;
mod manifest;
mod shims;
mod sources;

pub use entry::{ROOT_ELEMENT_ID, generate_entry_module};
pub use manifest::{DEFAULT_DEPENDENCIES, DEFAULT_DEV_DEPENDENCIES, generate_package_json};
pub use shims::write_shims;
pub use sources::{normalize_source_path, write_sources};

use crate::error::Result;
use crate::project::EphemeralProject;
use crate::request::BundleRequest;

/// Write the full project tree for a bundle request.
///
/// `style_config_text` is the reconstructed (merged or base-only) style
/// configuration program produced by the style compiler; it is written
/// verbatim as the project's config file so the build tooling sees the
/// same configuration the CSS generator used.
pub async fn scaffold(
    project: &EphemeralProject,
    request: &BundleRequest,
    style_config_text: &str,
) -> Result<()> {
    // Manifest first: the installer reads it at startup.
    let manifest = generate_package_json(request.id.as_str(), &request.dependencies);
    tokio::fs::write(project.manifest_path(), manifest).await?;

    write_sources(project, &request.files).await?;
    write_shims(project).await?;

    let entry = generate_entry_module(request.entry_file());
    tokio::fs::write(project.entry_path(), entry).await?;

    tokio::fs::write(project.style_config_path(), style_config_text).await?;
    tokio::fs::write(project.global_css_path(), combined_global_css(request)).await?;

    tracing::info!(
        id = %request.id,
        files = request.files.len(),
        "scaffolded project at {}",
        project.root().display()
    );

    Ok(())
}

/// Base stylesheet followed by the caller override, when present.
pub fn combined_global_css(request: &BundleRequest) -> String {
    match request.custom_css.as_deref() {
        Some(custom) if !custom.trim().is_empty() => {
            format!("{}\n{}", request.base_css, custom)
        }
        _ => request.base_css.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn request() -> BundleRequest {
        let mut files = BTreeMap::new();
        files.insert(
            "App.tsx".to_string(),
            "export default function App() { return <h1 className=\"text-xl\">Hello</h1>; }"
                .to_string(),
        );

        BundleRequest {
            id: "scaffold-test".to_string(),
            files,
            dependencies: BTreeMap::new(),
            base_config: "module.exports = { content: [] };".to_string(),
            custom_config: None,
            base_css: "@tailwind base;\n@tailwind utilities;".to_string(),
            custom_css: Some(".brand { color: teal; }".to_string()),
            backend: None,
            entry: None,
        }
    }

    #[tokio::test]
    async fn test_scaffold_writes_full_tree() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let req = request();
        let project = EphemeralProject::create(temp.path(), &req.id)
            .await
            .expect("Failed to create project");

        scaffold(&project, &req, "module.exports = { content: [] };")
            .await
            .expect("scaffold should succeed");

        assert!(project.manifest_path().exists());
        assert!(project.src_dir().join("App.tsx").exists());
        assert!(project.shim_dir().join("image.js").exists());
        assert!(project.entry_path().exists());
        assert!(project.style_config_path().exists());
        assert!(project.global_css_path().exists());

        let globals = std::fs::read_to_string(project.global_css_path()).unwrap();
        assert!(globals.contains("@tailwind base;"));
        assert!(globals.contains(".brand { color: teal; }"));
    }

    #[test]
    fn test_combined_css_without_override() {
        let mut req = request();
        req.custom_css = None;
        assert_eq!(combined_global_css(&req), req.base_css);
    }
}
