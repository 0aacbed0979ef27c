//! Integration tests for the HTTP surface.
//!
//! Routes are exercised in-process with a filesystem store; the full
//! bundle pipeline (which needs npm) is covered in kiln-core's tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tempfile::TempDir;
use tower::ServiceExt;

use kiln_core::{ArtifactStore, BackendKind, CompiledArtifact, FsStore, PipelineOptions};
use kiln_server::{AppState, create_router};

async fn app_with_store() -> (TempDir, Router, Arc<FsStore>) {
    let temp = TempDir::new().expect("temp dir");
    let store = Arc::new(FsStore::new(temp.path(), "/static"));

    let state = Arc::new(AppState {
        store: store.clone(),
        options: PipelineOptions {
            workdir: temp.path().join("work"),
            ..PipelineOptions::default()
        },
    });

    let router = create_router(state, vec!["https://app.example.com".to_string()]);
    (temp, router, store)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

fn sample_artifact() -> CompiledArtifact {
    CompiledArtifact {
        html: "<html><body>published</body></html>".to_string(),
        script: "console.log(\"x\")".to_string(),
        stylesheet: ".p-4 { padding: 1rem; }".to_string(),
        backend: BackendKind::Esbuild,
    }
}

#[tokio::test]
async fn test_health() {
    let (_temp, app, _store) = app_with_store().await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("\"status\":\"ok\""));
}

#[tokio::test]
async fn test_compile_css_happy_path() {
    let (_temp, app, _store) = app_with_store().await;

    let payload = serde_json::json!({
        "sources": ["import React from \"react\";\n<div className=\"p-4 text-xl\" />"],
        "base_config": "module.exports = { darkMode: \"class\", content: [] };",
        "base_css": "@tailwind utilities;"
    });

    let response = app
        .oneshot(
            Request::post("/compile-css")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains(".p-4"));
    assert!(body.contains("font-size"));
}

#[tokio::test]
async fn test_compile_css_with_malformed_override_still_succeeds() {
    let (_temp, app, _store) = app_with_store().await;

    let payload = serde_json::json!({
        "sources": ["<div className=\"p-4\" />"],
        "base_config": "module.exports = { content: [] };",
        "custom_config": "not a config at all {{{",
        "base_css": ""
    });

    let response = app
        .oneshot(
            Request::post("/compile-css")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(!parsed["css"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_compile_css_broken_base_is_500_with_code() {
    let (_temp, app, _store) = app_with_store().await;

    let payload = serde_json::json!({
        "sources": [],
        "base_config": "garbage {{{",
        "base_css": ""
    });

    let response = app
        .oneshot(
            Request::post("/compile-css")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let parsed: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(parsed["code"], "CSS_COMPILATION_ERROR");
}

#[tokio::test]
async fn test_bundled_page_roundtrip() {
    let (_temp, app, store) = app_with_store().await;
    store.save_bundle("page-1", &sample_artifact()).await.unwrap();

    let response = app
        .oneshot(
            Request::get("/bundled-page?id=page-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    assert!(body_string(response).await.contains("published"));
}

#[tokio::test]
async fn test_bundled_page_missing_is_404_envelope() {
    let (_temp, app, _store) = app_with_store().await;

    let response = app
        .oneshot(
            Request::get("/bundled-page?id=never-published")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let parsed: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(parsed["code"], "BUNDLED_PAGE_FETCH_ERROR");
}

#[tokio::test]
async fn test_static_asset_content_types() {
    let (_temp, app, store) = app_with_store().await;
    store.save_bundle("page-2", &sample_artifact()).await.unwrap();

    let response = app
        .clone()
        .oneshot(Request::get("/static/page-2.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/css")
    );

    let response = app
        .oneshot(Request::get("/static/missing.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_rejects_traversal_names() {
    let (_temp, app, _store) = app_with_store().await;

    let response = app
        .oneshot(
            Request::get("/static/..%2F..%2Fetc%2Fpasswd")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_for_allowed_origin() {
    let (_temp, app, _store) = app_with_store().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/bundle")
                .header(header::ORIGIN, "https://app.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap()),
        Some("https://app.example.com")
    );
}

#[tokio::test]
async fn test_cors_denies_unknown_origin() {
    let (_temp, app, _store) = app_with_store().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/bundle")
                .header(header::ORIGIN, "https://evil.example.net")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
