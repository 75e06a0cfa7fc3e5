//! Read-only queries over the stored catalog.

use anyhow::Result;

use crate::language::Language;
use crate::model::{Author, Book};
use crate::store::CatalogStore;

/// Aggregate download figures for the whole catalog.
///
/// On an empty catalog `count` is 0 and the aggregates are `None`; there is
/// no zero-average or division-by-zero case to worry about downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadStats {
    pub count: usize,
    pub average: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

/// Books stored in the given language, validated against the recognized set.
///
/// Unlike the ingestion path, an unrecognized code here is the user's typo
/// and is rejected, not mapped to `Unknown`. An empty result is fine.
pub fn books_by_language(store: &impl CatalogStore, code: &str) -> Result<Vec<Book>> {
    let language = Language::resolve_strict(code)?;
    store.by_language(language)
}

/// Every stored author alive in `year` (both lifespan bounds known and
/// bracketing the year).
pub fn authors_alive_in_year(store: &impl CatalogStore, year: i32) -> Result<Vec<Author>> {
    store.authors_alive_in_year(year)
}

/// Every stored author, in storage order (book order, then author order
/// within each book).
pub fn all_authors(store: &impl CatalogStore) -> Result<Vec<Author>> {
    Ok(store
        .all()?
        .into_iter()
        .flat_map(|book| book.authors)
        .collect())
}

/// The `n` most downloaded books, descending. The sort is stable, so ties
/// keep storage order; asking for more than exists returns everything.
pub fn top_by_downloads(store: &impl CatalogStore, n: usize) -> Result<Vec<Book>> {
    let mut books = store.all()?;
    books.sort_by(|a, b| {
        b.downloads
            .partial_cmp(&a.downloads)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    books.truncate(n);
    Ok(books)
}

/// Download statistics across the whole catalog.
pub fn download_statistics(store: &impl CatalogStore) -> Result<DownloadStats> {
    let books = store.all()?;

    if books.is_empty() {
        return Ok(DownloadStats {
            count: 0,
            average: None,
            max: None,
            min: None,
        });
    }

    let count = books.len();
    let total: f64 = books.iter().map(|b| b.downloads).sum();
    let max = books.iter().map(|b| b.downloads).fold(f64::MIN, f64::max);
    let min = books.iter().map(|b| b.downloads).fold(f64::MAX, f64::min);

    Ok(DownloadStats {
        count,
        average: Some(total / count as f64),
        max: Some(max),
        min: Some(min),
    })
}
