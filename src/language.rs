//! Language type: the closed set of language codes the catalog recognizes.
//!
//! Gutendex tags books with ISO 639-1 codes. The catalog keeps a fixed set of
//! them plus an `Unknown` sentinel so that ingestion never fails on a code we
//! have not seen before, while user-typed query input is still validated.

use crate::error::CatalogError;

/// A language recognized by the catalog.
///
/// `Unknown` is a real member of the set: books ingested with an unrecognized
/// code carry it, and it round-trips through the store like any other code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Spanish,
    English,
    French,
    Portuguese,
    German,
    Italian,
    Chinese,
    Japanese,
    Russian,
    Latin,
    Dutch,
    Unknown,
}

/// Every variant, in declaration order. Used for code lookup and by the menu
/// to list what the user may type.
pub const ALL_LANGUAGES: [Language; 12] = [
    Language::Spanish,
    Language::English,
    Language::French,
    Language::Portuguese,
    Language::German,
    Language::Italian,
    Language::Chinese,
    Language::Japanese,
    Language::Russian,
    Language::Latin,
    Language::Dutch,
    Language::Unknown,
];

impl Language {
    /// Resolve a code coming from Gutendex data.
    ///
    /// Case-insensitive exact match against the fixed set; anything
    /// unrecognized becomes `Unknown`. This path never fails: upstream data
    /// must not be able to abort an ingestion.
    pub fn resolve(code: &str) -> Language {
        Self::lookup(code).unwrap_or(Language::Unknown)
    }

    /// Resolve a code typed by the user.
    ///
    /// Same matching rule as [`Language::resolve`], but an unrecognized code
    /// is rejected with `InvalidLanguageCode` instead of being mapped to
    /// `Unknown`. `"unknown"` itself is not accepted here: it is a fallback
    /// for upstream data, not a queryable language.
    pub fn resolve_strict(code: &str) -> Result<Language, CatalogError> {
        match Self::lookup(code) {
            Some(Language::Unknown) | None => {
                Err(CatalogError::InvalidLanguageCode(code.trim().to_string()))
            }
            Some(lang) => Ok(lang),
        }
    }

    fn lookup(code: &str) -> Option<Language> {
        let needle = code.trim();
        ALL_LANGUAGES
            .iter()
            .copied()
            .find(|lang| lang.code().eq_ignore_ascii_case(needle))
    }

    /// The wire code, as Gutendex spells it.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::English => "en",
            Language::French => "fr",
            Language::Portuguese => "pt",
            Language::German => "de",
            Language::Italian => "it",
            Language::Chinese => "zh",
            Language::Japanese => "ja",
            Language::Russian => "ru",
            Language::Latin => "la",
            Language::Dutch => "nl",
            Language::Unknown => "unknown",
        }
    }

    /// Human-readable name shown in the menu, total over the set.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Spanish => "Español",
            Language::English => "Inglés",
            Language::French => "Francés",
            Language::Portuguese => "Portugués",
            Language::German => "Alemán",
            Language::Italian => "Italiano",
            Language::Chinese => "Chino",
            Language::Japanese => "Japonés",
            Language::Russian => "Ruso",
            Language::Latin => "Latín",
            Language::Dutch => "Holandés",
            Language::Unknown => "Desconocido",
        }
    }
}
