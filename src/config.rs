use anyhow::Result;

#[derive(Debug, Clone)]
pub struct Config {
    // Gutendex
    pub gutendex_base_url: String,

    // Storage
    pub database_path: String,

    // Queries
    pub top_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Gutendex API root
            gutendex_base_url: std::env::var("GUTENDEX_BASE_URL")
                .unwrap_or_else(|_| "https://gutendex.com".to_string()),

            // SQLite catalog location
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/catalog.db".to_string()),

            // How many books the "most downloaded" listing shows
            top_limit: std::env::var("TOP_BOOKS_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        })
    }
}
