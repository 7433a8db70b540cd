//! Request language extractor
//!
//! Resolves the language of a request from the `lang` query parameter, then
//! the `X-Language` header, then `Accept-Language`. Unknown values fall back
//! to English.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};

use crate::utils::localization::Language;

pub const LANGUAGE_HEADER: &str = "x-language";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestLanguage(pub Language);

impl RequestLanguage {
    pub fn resolve(parts: &Parts) -> Language {
        let from_query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(params)| params.get("lang").and_then(|v| Language::from_code(v)));

        from_query
            .or_else(|| header_value(parts, LANGUAGE_HEADER).and_then(Language::from_code))
            .or_else(|| {
                header_value(parts, ACCEPT_LANGUAGE.as_str())
                    .and_then(Language::from_accept_language)
            })
            .unwrap_or_default()
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|value| value.to_str().ok())
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestLanguage
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestLanguage(Self::resolve(parts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_query_wins_over_headers() {
        let parts = parts("/api/vehicle-import?lang=ar", &[("x-language", "en")]);
        assert_eq!(RequestLanguage::resolve(&parts), Language::Arabic);
    }

    #[test]
    fn test_custom_header_wins_over_accept_language() {
        let parts = parts("/", &[("x-language", "ar"), ("accept-language", "en-US,en;q=0.9")]);
        assert_eq!(RequestLanguage::resolve(&parts), Language::Arabic);
    }

    #[test]
    fn test_accept_language_skips_unsupported() {
        let parts = parts("/", &[("accept-language", "fr-FR,ar;q=0.8,en;q=0.5")]);
        assert_eq!(RequestLanguage::resolve(&parts), Language::Arabic);
    }

    #[test]
    fn test_unknown_values_fall_back_to_english() {
        let unknown = parts("/?lang=de", &[("x-language", "zz")]);
        assert_eq!(RequestLanguage::resolve(&unknown), Language::English);
        assert_eq!(RequestLanguage::resolve(&parts("/", &[])), Language::English);
    }
}
