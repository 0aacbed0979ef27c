//! Ephemeral project directory management.
//!
//! Each bundle request owns exactly one [`EphemeralProject`]: a uniquely
//! named working tree that holds the generated manifest, the caller's
//! sources, the compatibility shims, and the bundler output. The directory
//! name is derived from the validated request identifier plus a random
//! suffix, so concurrent requests can never collide regardless of clock
//! resolution.
//!
//! ```text
//! <workdir>/<id>-<suffix>/
//! ├── package.json        # generated manifest
//! ├── tailwind.config.js  # reconstructed merged style config
//! ├── shims/next/         # framework compatibility stubs
//! ├── src/                # caller sources + generated entry
//! │   ├── main.jsx
//! │   └── globals.css
//! └── dist/               # bundler output
//! ```

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::Result;

/// Disposable on-disk working tree for a single bundle request.
#[derive(Debug, Clone)]
pub struct EphemeralProject {
    /// Project root directory.
    root: PathBuf,

    /// Validated request identifier this project was created for.
    id: String,
}

impl EphemeralProject {
    /// Create a fresh project directory under `workdir`.
    ///
    /// The caller must have validated `id` already; the directory name is
    /// `<id>-<uuid>` and is created together with the `src/`, `shims/` and
    /// `dist/` subtrees.
    pub async fn create(workdir: &Path, id: &str) -> Result<Self> {
        let suffix = Uuid::new_v4().simple().to_string();
        let root = workdir.join(format!("{}-{}", id, suffix));

        if let Err(e) = Self::create_subtrees(&root).await {
            // A half-created root has no owner yet; remove it here so no
            // partial directory survives a failed create.
            let _ = tokio::fs::remove_dir_all(&root).await;
            return Err(e.into());
        }

        tracing::debug!("created ephemeral project at {}", root.display());

        Ok(Self {
            root,
            id: id.to_string(),
        })
    }

    async fn create_subtrees(root: &Path) -> std::io::Result<()> {
        tokio::fs::create_dir_all(root.join("src")).await?;
        tokio::fs::create_dir_all(root.join("shims")).await?;
        tokio::fs::create_dir_all(root.join("dist")).await?;
        Ok(())
    }

    /// Project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Request identifier this project belongs to.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path of the dependency manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("package.json")
    }

    /// Source root. All caller files land below this directory.
    pub fn src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    /// Root of the compatibility shim package that shadows `next`.
    pub fn shim_dir(&self) -> PathBuf {
        self.root.join("shims").join("next")
    }

    /// Generated entry module that mounts the caller's top component.
    pub fn entry_path(&self) -> PathBuf {
        self.src_dir().join("main.jsx")
    }

    /// Reconstructed style configuration file.
    pub fn style_config_path(&self) -> PathBuf {
        self.root.join("tailwind.config.js")
    }

    /// Combined global stylesheet.
    pub fn global_css_path(&self) -> PathBuf {
        self.src_dir().join("globals.css")
    }

    /// Bundler output directory.
    pub fn out_dir(&self) -> PathBuf {
        self.root.join("dist")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_makes_subtrees() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let project = EphemeralProject::create(temp.path(), "abc")
            .await
            .expect("Failed to create project");

        assert!(project.src_dir().exists());
        assert!(project.out_dir().exists());
        assert!(project.root().starts_with(temp.path()));
        assert_eq!(project.id(), "abc");
    }

    #[tokio::test]
    async fn test_concurrent_creates_never_collide() {
        let temp = TempDir::new().expect("Failed to create temp dir");

        let a = EphemeralProject::create(temp.path(), "same-id")
            .await
            .expect("first create");
        let b = EphemeralProject::create(temp.path(), "same-id")
            .await
            .expect("second create");

        assert_ne!(a.root(), b.root());
    }
}
