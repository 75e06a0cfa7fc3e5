//! Search-and-dedupe ingestion workflow.

use anyhow::Result;
use tracing::info;

use crate::gutendex::RawBookRecord;
use crate::model::Book;
use crate::store::CatalogStore;

/// What an ingestion attempt produced. Only `Inserted` mutates the store;
/// the other two are normal outcomes, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// A new book was constructed and persisted.
    Inserted(Book),
    /// A stored book already covered this title; it is returned unchanged.
    AlreadyExists(Book),
    /// No search candidate matched the query.
    NotFound,
}

/// Ingest the best match for `query` out of raw search `candidates`.
///
/// The candidate is the first record whose title contains the query as a
/// case-insensitive substring, in the order supplied — the search provider's
/// relevance order is trusted, never re-sorted. Dedup is a second substring
/// probe the other way around: a stored title containing the candidate's
/// title counts as the same work. This deliberately tolerates subtitle and
/// edition drift between repeated searches, at the cost of titles that are
/// substrings of each other shadowing one another.
pub fn ingest_by_title_search(
    store: &impl CatalogStore,
    query: &str,
    candidates: &[RawBookRecord],
) -> Result<IngestOutcome> {
    let needle = query.to_lowercase();
    let candidate = candidates
        .iter()
        .find(|record| record.title.to_lowercase().contains(&needle));

    let Some(candidate) = candidate else {
        info!("No search result matched '{}'", query);
        return Ok(IngestOutcome::NotFound);
    };

    if let Some(existing) = store.find_by_title_contains(&candidate.title)? {
        info!("'{}' already catalogued as '{}'", candidate.title, existing.title);
        return Ok(IngestOutcome::AlreadyExists(existing));
    }

    let book = Book::from_record(candidate)?;
    let stored = store.insert(&book)?;
    info!("Catalogued '{}' ({} authors)", stored.title, stored.authors.len());

    Ok(IngestOutcome::Inserted(stored))
}
