//! Request and response body types for the HTTP surface.

use serde::{Deserialize, Serialize};

pub use kiln_core::BundleRequest;

/// Success body for `POST /bundle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleResponse {
    pub success: bool,
    pub id: String,
    /// Public URL of the published HTML document.
    pub html: String,
}

/// Request body for `POST /compile-css`: standalone style compilation
/// against caller code/demo snippets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileCssRequest {
    /// Code snippets to scan for utility classes. `import` lines are
    /// stripped before scanning.
    #[serde(default)]
    pub sources: Vec<String>,

    /// Base style configuration source. Required and trusted.
    pub base_config: String,

    /// Optional caller override configuration source.
    #[serde(default)]
    pub custom_config: Option<String>,

    /// Base global stylesheet.
    #[serde(default)]
    pub base_css: String,

    /// Optional override stylesheet.
    #[serde(default)]
    pub custom_css: Option<String>,
}

/// Success body for `POST /compile-css`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileCssResponse {
    pub css: String,
}

/// Query parameters for `GET /bundled-page`.
#[derive(Debug, Clone, Deserialize)]
pub struct BundledPageQuery {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_response_serializes() {
        let response = BundleResponse {
            success: true,
            id: "x".to_string(),
            html: "/static/x.html".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["html"], "/static/x.html");
    }

    #[test]
    fn test_compile_css_request_defaults() {
        let request: CompileCssRequest = serde_json::from_str(
            r#"{ "base_config": "module.exports = {};" }"#,
        )
        .unwrap();
        assert!(request.sources.is_empty());
        assert!(request.custom_config.is_none());
        assert_eq!(request.base_css, "");
    }
}
