//! Catalog of Gutendex books.
//!
//! Books found through the Gutendex search API are persisted together with
//! their authors and language sets, then queried locally: filter by language,
//! authors alive in a given year, most downloaded, download statistics.
//!
//! Module map:
//! - `gutendex`: search client and raw record shapes (the external API)
//! - `language`: the recognized language codes and their fallback policy
//! - `model`: `Book` and its owned `Author`s, raw-record construction
//! - `store`: the `CatalogStore` seam and the SQLite implementation
//! - `ingest`: search-match, dedup and persist workflow
//! - `query`: the read-only catalog queries

pub mod config;
pub mod error;
pub mod gutendex;
pub mod ingest;
pub mod language;
pub mod model;
pub mod query;
pub mod store;
