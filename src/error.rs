//! Typed errors for the catalog core.
//!
//! Collaborator failures (HTTP, SQLite) travel as `anyhow::Error` with
//! context attached at the call site; these variants cover only the
//! conditions the core itself detects.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A raw record from the search provider cannot become a book: empty
    /// title, or a present negative download count. The record is dropped
    /// before any store mutation.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A user-typed language code is not in the recognized set. Upstream
    /// data never produces this; only query input does.
    #[error("invalid language code: '{0}'")]
    InvalidLanguageCode(String),
}
