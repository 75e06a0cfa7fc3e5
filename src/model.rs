//! Catalog entities: books and the authors they own.

use crate::error::CatalogError;
use crate::gutendex::RawBookRecord;
use crate::language::Language;

/// An author of a catalogued book.
///
/// Authors exist only inside their owning [`Book`]: they are created during
/// book construction, persisted and deleted with the book, and carry no
/// identity of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub name: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
}

impl Author {
    /// Whether the author was alive in `year`. An absent birth or death
    /// year means "unknown" and never matches.
    pub fn alive_in(&self, year: i32) -> bool {
        match (self.birth_year, self.death_year) {
            (Some(birth), Some(death)) => birth <= year && year <= death,
            _ => false,
        }
    }
}

/// A catalogued book with its owned authors and normalized language set.
///
/// `source_id` is the Gutendex id, kept for reference only; the catalog's
/// uniqueness key is the title, enforced at the persistence boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub source_id: i64,
    pub title: String,
    pub authors: Vec<Author>,
    pub languages: Vec<Language>,
    pub downloads: f64,
}

impl Book {
    /// Build a book from a raw search result.
    ///
    /// Language codes go through [`Language::resolve`], so an unrecognized
    /// code becomes [`Language::Unknown`] rather than an error; encounter
    /// order is kept and exact duplicates dropped. A missing download count
    /// defaults to 0.0. The two conditions that reject the record outright
    /// are an empty title and a present negative download count.
    pub fn from_record(record: &RawBookRecord) -> Result<Book, CatalogError> {
        if record.title.trim().is_empty() {
            return Err(CatalogError::MalformedRecord(format!(
                "record {} has an empty title",
                record.id
            )));
        }

        let downloads = match record.download_count {
            Some(count) if count < 0.0 => {
                return Err(CatalogError::MalformedRecord(format!(
                    "record {} has a negative download count ({})",
                    record.id, count
                )));
            }
            Some(count) => count,
            None => 0.0,
        };

        let authors = record
            .authors
            .iter()
            .map(|raw| Author {
                name: raw.name.clone(),
                birth_year: raw.birth_year,
                death_year: raw.death_year,
            })
            .collect();

        let mut languages: Vec<Language> = Vec::new();
        for code in &record.languages {
            let language = Language::resolve(code);
            if !languages.contains(&language) {
                languages.push(language);
            }
        }

        Ok(Book {
            source_id: record.id,
            title: record.title.clone(),
            authors,
            languages,
            downloads,
        })
    }
}
