//! Localization helpers
//!
//! This module holds the request language and the shared projection of
//! bilingual entities into display labels. Language is always passed in
//! explicitly; nothing here reads session or global state.

use serde::{Deserialize, Serialize};

/// Languages supported by the back office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Arabic,
}

impl Language {
    /// Parse a language code such as `en`, `ar-SA` or `arabic`.
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "en" | "english" => Some(Language::English),
            "ar" | "arabic" => Some(Language::Arabic),
            _ => None,
        }
    }

    /// Resolve the first supported language of an `Accept-Language` header.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        header
            .split(',')
            .filter_map(|range| range.split(';').next())
            .find_map(Language::from_code)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Arabic)
    }

    /// Pick the text for this language, falling back to English when the
    /// Arabic text is blank.
    pub fn pick<'a>(&self, english: &'a str, arabic: &'a str) -> &'a str {
        match self {
            Language::Arabic if !arabic.trim().is_empty() => arabic,
            _ => english,
        }
    }
}

/// Entities carrying an English and an Arabic name
pub trait LocalizedName {
    fn name_en(&self) -> &str;
    fn name_ar(&self) -> Option<&str>;
}

/// Display label of a bilingual entity in the given language.
pub fn localized_label<T: LocalizedName + ?Sized>(entity: &T, lang: Language) -> String {
    lang.pick(entity.name_en(), entity.name_ar().unwrap_or_default())
        .trim()
        .to_string()
}
