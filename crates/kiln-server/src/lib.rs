//! kiln HTTP server.
//!
//! Thin dispatch layer over the core bundle pipeline:
//! - **Routes**: `/bundle`, `/compile-css`, `/bundled-page`, `/static/*`
//! - **CORS**: exact-origin allow list plus local-development hosts
//! - **Errors**: JSON envelopes with per-route machine-readable codes
//! - **Storage**: injected artifact store (filesystem or remote HTTP)

pub mod cors;
pub mod error;
pub mod protocol;
pub mod remote_store;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use kiln_core::{ArtifactStore, PipelineOptions};

pub use error::{ErrorCode, ServerError, ServerResult};
pub use protocol::{BundleRequest, BundleResponse, CompileCssRequest, CompileCssResponse};
pub use remote_store::RemoteStore;
pub use routes::{AppState, create_router};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Exact origins allowed by CORS, in addition to local dev hosts.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4400,
            allowed_origins: Vec::new(),
        }
    }
}

/// Start the kiln server with the given store and pipeline options.
pub async fn serve(
    store: Arc<dyn ArtifactStore>,
    options: PipelineOptions,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState { store, options });
    let app = create_router(state, config.allowed_origins.clone());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid address: {}:{}", config.host, config.port))?;

    tracing::info!("Starting kiln server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Received shutdown signal");
            }
        })
        .await?;

    Ok(())
}
