//! Request middleware
//!
//! CORS configuration and the request-language extractor.

pub mod cors;
pub mod language;

pub use cors::cors_middleware;
pub use language::RequestLanguage;
