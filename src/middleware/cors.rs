//! CORS middleware
//!
//! Allows any origin when none are configured, otherwise only the listed
//! origins.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;

use crate::middleware::language::LANGUAGE_HEADER;

/// Build the CORS layer for the configured origins
pub fn cors_middleware(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("accept-language"),
            HeaderName::from_static("origin"),
            HeaderName::from_static(LANGUAGE_HEADER),
        ])
        .expose_headers([HeaderName::from_static("content-disposition")])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
