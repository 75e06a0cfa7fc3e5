//! Gutendex search client.
//!
//! Thin collaborator around `GET {base}/books/?search=...`. It returns the
//! raw records in the API's relevance order and decodes nothing beyond the
//! fields the catalog consumes; matching, deduplication and persistence live
//! in [`crate::ingest`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// An author as Gutendex reports it. Either year may be missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAuthor {
    pub name: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
}

/// One search result, before any validation or normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBookRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<RawAuthor>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub download_count: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<RawBookRecord>,
}

/// Run a title search against Gutendex.
///
/// Only the first page is fetched; the API's relevance order is preserved.
pub async fn search(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
) -> Result<Vec<RawBookRecord>> {
    let url = format!("{}/books/", base_url.trim_end_matches('/'));

    let response = client
        .get(&url)
        .query(&[("search", query)])
        .send()
        .await
        .context("Failed to send request to Gutendex")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Gutendex error ({}): {}", status, body);
    }

    let search_response: SearchResponse = response
        .json()
        .await
        .context("Failed to parse Gutendex response")?;

    info!(
        "Gutendex returned {} results for '{}'",
        search_response.results.len(),
        query
    );

    Ok(search_response.results)
}
