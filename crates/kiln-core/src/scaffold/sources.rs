//! Caller source file placement.
//!
//! All caller-supplied files land under the project's fixed `src/` root.
//! Relative paths are normalized component by component; anything that
//! would resolve outside the source root is rejected before a single byte
//! is written.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use futures::future::try_join_all;

use crate::error::{Error, Result};
use crate::project::EphemeralProject;

/// Normalize a caller-supplied relative path against the source root.
///
/// Rejects absolute paths, drive/root prefixes, and any `..` component.
/// `.` components and empty segments are dropped.
pub fn normalize_source_path(relative: &str) -> Result<PathBuf> {
    let path = Path::new(relative);
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::Validation(format!(
                    "source path {:?} escapes the source root",
                    relative
                )));
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(Error::Validation(format!(
            "source path {:?} is empty after normalization",
            relative
        )));
    }

    Ok(normalized)
}

/// Write all caller sources under `src/`.
///
/// Writes touch disjoint paths and are issued concurrently; every write
/// must complete before dependency installation starts, since the
/// installer reads the manifest and tree synchronously at startup.
pub async fn write_sources(
    project: &EphemeralProject,
    files: &BTreeMap<String, String>,
) -> Result<()> {
    let src_dir = project.src_dir();

    // Validate every path up front so a traversal attempt aborts the
    // request before any file lands on disk.
    let mut targets = Vec::with_capacity(files.len());
    for (relative, contents) in files {
        let target = src_dir.join(normalize_source_path(relative)?);
        targets.push((target, contents));
    }

    try_join_all(targets.into_iter().map(|(target, contents)| async move {
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, contents).await?;
        Ok::<_, Error>(())
    }))
    .await?;

    tracing::debug!("wrote {} source files under {}", files.len(), src_dir.display());
    Ok(())
}
