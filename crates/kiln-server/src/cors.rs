//! CORS policy.
//!
//! Browsers calling the bundle API come from an allow-list of exact
//! origins, plus whatever a developer runs locally: `localhost`,
//! `127.0.0.*`, private `192.168.*` hosts, and `*.local` names, on any
//! port and either scheme. Every other origin gets no
//! `Access-Control-Allow-Origin` header back.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build the CORS layer from the configured exact-origin allow list.
pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let predicate = move |origin: &HeaderValue, _req: &axum::http::request::Parts| {
        let Ok(origin) = origin.to_str() else {
            return false;
        };
        allowed_origins.iter().any(|allowed| allowed == origin) || is_local_dev_origin(origin)
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(predicate))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

/// Whether an origin looks like a local development host.
fn is_local_dev_origin(origin: &str) -> bool {
    let Some(rest) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };

    let host = rest.split(':').next().unwrap_or("");

    host == "localhost"
        || host.starts_with("127.0.0.")
        || host.starts_with("192.168.")
        || host.ends_with(".local")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_dev_origins() {
        assert!(is_local_dev_origin("http://localhost:3000"));
        assert!(is_local_dev_origin("http://127.0.0.1:8080"));
        assert!(is_local_dev_origin("http://192.168.1.20:5173"));
        assert!(is_local_dev_origin("https://mymachine.local"));
    }

    #[test]
    fn test_foreign_origins_rejected() {
        assert!(!is_local_dev_origin("https://evil.example.com"));
        assert!(!is_local_dev_origin("http://192.169.0.1"));
        assert!(!is_local_dev_origin("ftp://localhost"));
        assert!(!is_local_dev_origin("http://localhost.evil.com"));
    }
}
