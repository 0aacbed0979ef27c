//! Durable artifact storage.
//!
//! Compiled artifacts are persisted as three objects under a single fixed
//! namespace (`bundled/<id>.html`, `.js`, `.css`), keyed by the validated
//! request identifier. A second bundle call with the same identifier
//! overwrites all three, last-writer-wins, no versioning. The store is an
//! injected dependency so the core pipeline stays testable without
//! network access; the filesystem implementation lives here, the remote
//! HTTP implementation in the server crate.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::request::{BackendKind, validate_identifier};

/// Fixed storage namespace for bundle artifacts.
pub const BUNDLE_PREFIX: &str = "bundled";

/// The three output artifacts of one successful bundle request, plus a tag
/// identifying which backend produced the script/markup. Immutable once
/// produced.
#[derive(Debug, Clone)]
pub struct CompiledArtifact {
    pub html: String,
    pub script: String,
    pub stylesheet: String,
    pub backend: BackendKind,
}

/// Identifier-keyed durable storage for compiled artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist all three artifacts under the identifier and return the
    /// public URL of the published HTML document.
    async fn save_bundle(&self, id: &str, artifact: &CompiledArtifact) -> Result<String>;

    /// Fetch a previously published page. A missing identifier is
    /// `Ok(None)`, distinct from transport failure, which errors.
    async fn load_page(&self, id: &str) -> Result<Option<String>>;

    /// Fetch a raw stored asset by filename from the same namespace.
    async fn load_static(&self, filename: &str) -> Result<Option<Vec<u8>>>;

    /// Public URL of a stored asset filename.
    fn public_url(&self, filename: &str) -> String;
}

/// Build a storage key, validating the identifier first. No key is ever
/// constructed from an unvalidated identifier.
pub fn bundle_key(id: &str, extension: &str) -> Result<String> {
    validate_identifier(id)?;
    Ok(format!("{}/{}.{}", BUNDLE_PREFIX, id, extension))
}

/// Validate a raw asset filename: `<identifier>.<alnum extension>`.
pub fn validate_static_filename(filename: &str) -> Result<()> {
    let Some((stem, extension)) = filename.rsplit_once('.') else {
        return Err(Error::InvalidIdentifier(filename.to_string()));
    };

    validate_identifier(stem)?;

    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidIdentifier(filename.to_string()));
    }

    Ok(())
}

/// Filesystem-backed store. Used by the one-shot CLI path and throughout
/// the test suite; serves public URLs beneath a configured base.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
    public_base: String,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Write one object atomically: temp file in the target directory,
    /// then rename over the final path.
    async fn put(&self, key: &str, contents: &[u8]) -> Result<()> {
        let target = self.object_path(key);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage(format!("create {}: {}", parent.display(), e)))?;
        }

        let temp = target.with_extension(format!("tmp-{}", Uuid::new_v4().simple()));
        tokio::fs::write(&temp, contents)
            .await
            .map_err(|e| Error::Storage(format!("write {}: {}", temp.display(), e)))?;
        tokio::fs::rename(&temp, &target)
            .await
            .map_err(|e| Error::Storage(format!("rename to {}: {}", target.display(), e)))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.object_path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!("read {}: {}", key, e))),
        }
    }
}

#[async_trait]
impl ArtifactStore for FsStore {
    async fn save_bundle(&self, id: &str, artifact: &CompiledArtifact) -> Result<String> {
        let html_key = bundle_key(id, "html")?;
        let script_key = bundle_key(id, "js")?;
        let stylesheet_key = bundle_key(id, "css")?;

        self.put(&script_key, artifact.script.as_bytes()).await?;
        self.put(&stylesheet_key, artifact.stylesheet.as_bytes()).await?;
        // The page goes last so a published page never references assets
        // that are not there yet.
        self.put(&html_key, artifact.html.as_bytes()).await?;

        tracing::info!(
            id,
            backend = artifact.backend.as_str(),
            "published bundle artifacts"
        );

        Ok(self.public_url(&format!("{}.html", id)))
    }

    async fn load_page(&self, id: &str) -> Result<Option<String>> {
        let key = bundle_key(id, "html")?;
        Ok(self
            .get(&key)
            .await?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    async fn load_static(&self, filename: &str) -> Result<Option<Vec<u8>>> {
        validate_static_filename(filename)?;
        self.get(&format!("{}/{}", BUNDLE_PREFIX, filename)).await
    }

    fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.public_base.trim_end_matches('/'), filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifact() -> CompiledArtifact {
        CompiledArtifact {
            html: "<html>page</html>".to_string(),
            script: "console.log(1)".to_string(),
            stylesheet: ".a { color: red; }".to_string(),
            backend: BackendKind::Esbuild,
        }
    }

    #[test]
    fn test_bundle_key_validates_first() {
        assert_eq!(bundle_key("abc", "html").unwrap(), "bundled/abc.html");
        assert!(bundle_key("../etc", "html").is_err());
        assert!(bundle_key("a b", "js").is_err());
    }

    #[test]
    fn test_static_filename_validation() {
        assert!(validate_static_filename("abc-1.js").is_ok());
        assert!(validate_static_filename("abc.css").is_ok());

        assert!(validate_static_filename("noextension").is_err());
        assert!(validate_static_filename("../x.js").is_err());
        assert!(validate_static_filename("a/b.js").is_err());
        assert!(validate_static_filename("a.j$").is_err());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let store = FsStore::new(temp.path(), "/static");

        let url = store.save_bundle("page-1", &artifact()).await.unwrap();
        assert_eq!(url, "/static/page-1.html");

        let page = store.load_page("page-1").await.unwrap();
        assert_eq!(page.as_deref(), Some("<html>page</html>"));

        let script = store.load_static("page-1.js").await.unwrap().unwrap();
        assert_eq!(script, b"console.log(1)");
    }

    #[tokio::test]
    async fn test_missing_page_is_none_not_error() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let store = FsStore::new(temp.path(), "/static");

        assert!(store.load_page("never-saved").await.unwrap().is_none());
        assert!(store.load_static("never-saved.js").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_id_rejected_before_io() {
        let store = FsStore::new("/definitely/not/writable", "/static");

        // Invalid identifiers error out before touching the filesystem.
        assert!(matches!(
            store.load_page("../../etc/passwd").await,
            Err(Error::InvalidIdentifier(_))
        ));
        assert!(matches!(
            store.save_bundle("bad id", &artifact()).await,
            Err(Error::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_overwrite_is_last_writer_wins() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let store = FsStore::new(temp.path(), "/static");

        store.save_bundle("page", &artifact()).await.unwrap();

        let mut second = artifact();
        second.html = "<html>v2</html>".to_string();
        store.save_bundle("page", &second).await.unwrap();

        assert_eq!(
            store.load_page("page").await.unwrap().as_deref(),
            Some("<html>v2</html>")
        );
    }
}
