//! Error types for the kiln server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use kiln_core::Error as CoreError;

/// Machine-readable error codes carried in the JSON envelope, one per
/// failing route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Bundle,
    CssCompilation,
    BundledPageFetch,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Bundle => "BUNDLE_ERROR",
            ErrorCode::CssCompilation => "CSS_COMPILATION_ERROR",
            ErrorCode::BundledPageFetch => "BUNDLED_PAGE_FETCH_ERROR",
        }
    }
}

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A pipeline failure, tagged with the route's error code.
    #[error("{summary}")]
    Pipeline {
        code: ErrorCode,
        summary: String,
        details: String,
    },

    /// Requested artifact does not exist. A defined outcome, not a
    /// transport failure.
    #[error("artifact not found: {0}")]
    NotFound(String),
}

impl ServerError {
    /// Wrap a core error for a given route.
    pub fn from_core(code: ErrorCode, error: CoreError) -> Self {
        let summary = match &error {
            CoreError::InvalidIdentifier(_) => "invalid identifier".to_string(),
            CoreError::Validation(_) => "invalid request".to_string(),
            CoreError::DependencyInstall { .. } => "dependency installation failed".to_string(),
            CoreError::Bundler { backend, .. } => format!("bundler {} failed", backend),
            CoreError::Css(_) => "css compilation failed".to_string(),
            CoreError::Storage(_) => "storage operation failed".to_string(),
            CoreError::Timeout { stage, .. } => format!("{} timed out", stage),
            CoreError::ToolNotFound(_) => "build tooling unavailable".to_string(),
            CoreError::Io(_) => "io failure".to_string(),
        };

        Self::Pipeline {
            code,
            summary,
            details: error.to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Pipeline {
                code,
                summary,
                details,
            } => {
                let body = json!({
                    "error": summary,
                    "details": details,
                    "code": code.as_str(),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            ServerError::NotFound(id) => {
                let body = json!({
                    "error": "not found",
                    "details": format!("no published artifact for {:?}", id),
                    "code": ErrorCode::BundledPageFetch.as_str(),
                });
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
        }
    }
}

/// Result type for server handlers.
pub type ServerResult<T> = Result<T, ServerError>;
