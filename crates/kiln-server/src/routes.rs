//! HTTP routes for the kiln server.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path as AxumPath, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};

use kiln_core::{ArtifactStore, PipelineOptions, StyleCompiler, run_bundle, strip_import_lines};

use crate::cors::cors_layer;
use crate::error::{ErrorCode, ServerError, ServerResult};
use crate::protocol::{
    BundleRequest, BundleResponse, BundledPageQuery, CompileCssRequest, CompileCssResponse,
};

/// Application state shared across handlers.
///
/// The artifact store is injected (filesystem or remote) so the routes
/// never reach for a global storage client.
pub struct AppState {
    pub store: Arc<dyn ArtifactStore>,
    pub options: PipelineOptions,
}

/// Create the router with all routes.
pub fn create_router(state: Arc<AppState>, allowed_origins: Vec<String>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/bundle", post(bundle_handler))
        .route("/compile-css", post(compile_css_handler))
        .route("/bundled-page", get(bundled_page_handler))
        .route("/static/{filename}", get(static_handler))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// Health check handler.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Run the full bundle pipeline.
async fn bundle_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BundleRequest>,
) -> ServerResult<Json<BundleResponse>> {
    let outcome = run_bundle(&request, state.store.as_ref(), &state.options)
        .await
        .map_err(|e| ServerError::from_core(ErrorCode::Bundle, e))?;

    Ok(Json(BundleResponse {
        success: true,
        id: outcome.id,
        html: outcome.html_url,
    }))
}

/// Run the style compiler alone, against caller snippets.
async fn compile_css_handler(
    Json(request): Json<CompileCssRequest>,
) -> ServerResult<Json<CompileCssResponse>> {
    let stripped: Vec<String> = request
        .sources
        .iter()
        .map(|source| strip_import_lines(source))
        .collect();
    let content: Vec<&str> = stripped.iter().map(|s| s.as_str()).collect();

    let stylesheet = match request.custom_css.as_deref() {
        Some(custom) if !custom.trim().is_empty() => {
            format!("{}\n{}", request.base_css, custom)
        }
        _ => request.base_css.clone(),
    };

    let artifacts = StyleCompiler::new()
        .compile(
            &request.base_config,
            request.custom_config.as_deref(),
            &content,
            &stylesheet,
        )
        .map_err(|e| ServerError::from_core(ErrorCode::CssCompilation, e))?;

    Ok(Json(CompileCssResponse {
        css: artifacts.css,
    }))
}

/// Fetch a previously published artifact's HTML.
async fn bundled_page_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BundledPageQuery>,
) -> ServerResult<Html<String>> {
    let page = state
        .store
        .load_page(&query.id)
        .await
        .map_err(|e| ServerError::from_core(ErrorCode::BundledPageFetch, e))?;

    match page {
        Some(html) => Ok(Html(html)),
        None => Err(ServerError::NotFound(query.id)),
    }
}

/// Fetch a raw stored asset by name; content type follows the extension.
async fn static_handler(
    State(state): State<Arc<AppState>>,
    AxumPath(filename): AxumPath<String>,
) -> Response {
    match state.store.load_static(&filename).await {
        Ok(Some(bytes)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type(&filename))],
            bytes,
        )
            .into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::debug!("static asset {:?} rejected: {}", filename, e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Content type for a stored asset, derived from the filename extension.
/// Unrecognized extensions fall back to plain text.
fn content_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first()
        .map(|mime| mime.to_string())
        .unwrap_or_else(|| mime_guess::mime::TEXT_PLAIN.to_string())
}
