//! Remote artifact store.
//!
//! Persists artifacts to an S3-compatible HTTP endpoint: objects are PUT
//! and GET at `<endpoint>/<bucket>/bundled/<id>.<ext>`. A 404 on read is
//! the defined not-found outcome; anything else non-2xx is a storage
//! error. One client is created per store instance and injected where
//! needed; there is no process-global storage client.

use async_trait::async_trait;

use kiln_core::store::{ArtifactStore, BUNDLE_PREFIX, CompiledArtifact, bundle_key};
use kiln_core::{Error, Result, validate_static_filename};

#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: reqwest::Client,
    /// Endpoint including the bucket, e.g. `https://storage.example.com/kiln-artifacts`.
    endpoint: String,
    /// Base under which stored assets are publicly reachable.
    public_base: String,
}

impl RemoteStore {
    pub fn new(endpoint: impl Into<String>, public_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            public_base: public_base.into(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.endpoint, key)
    }

    async fn put(&self, key: &str, content_type: &str, body: Vec<u8>) -> Result<()> {
        let url = self.object_url(key);
        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("PUT {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "PUT {} returned {}",
                url,
                response.status()
            )));
        }

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let url = self.object_url(key);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("GET {}: {}", url, e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Storage(format!("GET {} body: {}", url, e)))?;
        Ok(Some(bytes.to_vec()))
    }
}

#[async_trait]
impl ArtifactStore for RemoteStore {
    async fn save_bundle(&self, id: &str, artifact: &CompiledArtifact) -> Result<String> {
        let html_key = bundle_key(id, "html")?;
        let script_key = bundle_key(id, "js")?;
        let stylesheet_key = bundle_key(id, "css")?;

        self.put(&script_key, "application/javascript", artifact.script.clone().into_bytes())
            .await?;
        self.put(&stylesheet_key, "text/css", artifact.stylesheet.clone().into_bytes())
            .await?;
        // Page last, so it never references assets that are not there yet.
        self.put(&html_key, "text/html", artifact.html.clone().into_bytes())
            .await?;

        tracing::info!(
            id,
            backend = artifact.backend.as_str(),
            "published bundle artifacts to remote store"
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
