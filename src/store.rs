//! Catalog persistence.
//!
//! [`CatalogStore`] is the seam the ingestion and query logic talk to; the
//! shipped implementation is [`SqliteCatalog`], an embedded SQLite database.
//! Books own their authors and language rows: both are written in the same
//! transaction as the book and cascade-delete with it.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

use crate::language::Language;
use crate::model::{Author, Book};

/// Durable collection of books, the only mutable state in the system.
///
/// Storage order is insertion order and every listing operation preserves
/// it. Exact title uniqueness is enforced here, not in memory.
pub trait CatalogStore {
    /// First stored book whose title contains `needle` case-insensitively,
    /// in storage order. This is the dedup probe used at ingestion time.
    fn find_by_title_contains(&self, needle: &str) -> Result<Option<Book>>;

    /// Persist a book with its authors and language set atomically and
    /// return the stored copy. Fails if the exact title already exists.
    fn insert(&self, book: &Book) -> Result<Book>;

    /// Every stored book, in storage order.
    fn all(&self) -> Result<Vec<Book>>;

    /// Books whose language set contains `language`, in storage order.
    fn by_language(&self, language: Language) -> Result<Vec<Book>>;

    /// Authors with `birth_year <= year <= death_year`. Authors missing
    /// either year are excluded.
    fn authors_alive_in_year(&self, year: i32) -> Result<Vec<Author>>;
}

#[derive(Clone)]
pub struct SqliteCatalog {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalog {
    /// Open (or create) the catalog database and ensure the schema exists.
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)
            .context(format!("Failed to open database at {}", database_path))?;
        Self::from_connection(conn)
    }

    /// In-memory catalog, used by tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .context("Failed to enable foreign keys")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_id INTEGER NOT NULL,
                title TEXT NOT NULL UNIQUE,
                downloads REAL NOT NULL DEFAULT 0,
                ingested_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create books table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS authors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                birth_year INTEGER,
                death_year INTEGER
            )",
            [],
        )
        .context("Failed to create authors table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS book_languages (
                book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                code TEXT NOT NULL,
                PRIMARY KEY (book_id, position)
            )",
            [],
        )
        .context("Failed to create book_languages table")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn load_book(conn: &Connection, row_id: i64) -> Result<Book> {
        let (source_id, title, downloads): (i64, String, f64) = conn
            .query_row(
                "SELECT source_id, title, downloads FROM books WHERE id = ?1",
                params![row_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .context("Failed to load book row")?;

        let mut stmt = conn.prepare(
            "SELECT name, birth_year, death_year FROM authors WHERE book_id = ?1 ORDER BY id",
        )?;
        let authors = stmt
            .query_map(params![row_id], |row| {
                Ok(Author {
                    name: row.get(0)?,
                    birth_year: row.get(1)?,
                    death_year: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT code FROM book_languages WHERE book_id = ?1 ORDER BY position",
        )?;
        let languages = stmt
            .query_map(params![row_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?
            .iter()
            .map(|code| Language::resolve(code))
            .collect();

        Ok(Book {
            source_id,
            title,
            authors,
            languages,
            downloads,
        })
    }

    fn load_books(conn: &Connection, row_ids: &[i64]) -> Result<Vec<Book>> {
        row_ids
            .iter()
            .map(|&id| Self::load_book(conn, id))
            .collect()
    }
}

impl CatalogStore for SqliteCatalog {
    fn find_by_title_contains(&self, needle: &str) -> Result<Option<Book>> {
        let conn = self.conn.lock().unwrap();

        // LIKE is case-insensitive for ASCII, matching the lookup policy.
        let row_id: Option<i64> = conn
            .query_row(
                "SELECT id FROM books WHERE title LIKE '%' || ?1 || '%' ORDER BY id LIMIT 1",
                params![needle],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to search books by title")?;

        match row_id {
            Some(id) => Ok(Some(Self::load_book(&conn, id)?)),
            None => Ok(None),
        }
    }

    fn insert(&self, book: &Book) -> Result<Book> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().context("Failed to begin transaction")?;

        tx.execute(
            "INSERT INTO books (source_id, title, downloads, ingested_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                book.source_id,
                book.title,
                book.downloads,
                Utc::now().to_rfc3339()
            ],
        )
        .context(format!("Failed to insert book '{}'", book.title))?;
        let book_id = tx.last_insert_rowid();

        for author in &book.authors {
            tx.execute(
                "INSERT INTO authors (book_id, name, birth_year, death_year)
                 VALUES (?1, ?2, ?3, ?4)",
                params![book_id, author.name, author.birth_year, author.death_year],
            )
            .context("Failed to insert author")?;
        }

        for (position, language) in book.languages.iter().enumerate() {
            tx.execute(
                "INSERT INTO book_languages (book_id, position, code) VALUES (?1, ?2, ?3)",
                params![book_id, position as i64, language.code()],
            )
            .context("Failed to insert language")?;
        }

        tx.commit().context("Failed to commit book insert")?;

        Self::load_book(&conn, book_id)
    }

    fn all(&self) -> Result<Vec<Book>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id FROM books ORDER BY id")?;
        let row_ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Self::load_books(&conn, &row_ids)
    }

    fn by_language(&self, language: Language) -> Result<Vec<Book>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT b.id FROM books b
             JOIN book_languages bl ON bl.book_id = b.id
             WHERE bl.code = ?1
             ORDER BY b.id",
        )?;
        let row_ids = stmt
            .query_map(params![language.code()], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Self::load_books(&conn, &row_ids)
    }

    fn authors_alive_in_year(&self, year: i32) -> Result<Vec<Author>> {
        let conn = self.conn.lock().unwrap();

        // NULL years never satisfy the comparisons, so authors with an
        // unknown birth or death year are excluded.
        let mut stmt = conn.prepare(
            "SELECT name, birth_year, death_year FROM authors
             WHERE birth_year <= ?1 AND death_year >= ?1
             ORDER BY id",
        )?;
        let authors = stmt
            .query_map(params![year], |row| {
                Ok(Author {
                    name: row.get(0)?,
                    birth_year: row.get(1)?,
                    death_year: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(authors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, downloads: f64, languages: Vec<Language>) -> Book {
        Book {
            source_id: 1,
            title: title.to_string(),
            authors: vec![Author {
                name: "Austen, Jane".to_string(),
                birth_year: Some(1775),
                death_year: Some(1817),
            }],
            languages,
            downloads,
        }
    }

    // ==================== Insert / Lookup Tests ====================

    #[test]
    fn test_insert_and_find_by_title_substring() {
        let store = SqliteCatalog::in_memory().unwrap();
        store
            .insert(&book("Pride and Prejudice", 58943.0, vec![Language::English]))
            .unwrap();

        let found = store.find_by_title_contains("pride").unwrap();
        let found = found.expect("Should match case-insensitively");
        assert_eq!(found.title, "Pride and Prejudice");
        assert_eq!(found.downloads, 58943.0);
        assert_eq!(found.languages, vec![Language::English]);
        assert_eq!(found.authors.len(), 1);
    }

    #[test]
    fn test_find_by_title_no_match() {
        let store = SqliteCatalog::in_memory().unwrap();
        store
            .insert(&book("Pride and Prejudice", 1.0, vec![Language::English]))
            .unwrap();

        assert!(store.find_by_title_contains("moby").unwrap().is_none());
    }

    #[test]
    fn test_find_by_title_returns_first_in_storage_order() {
        let store = SqliteCatalog::in_memory().unwrap();
        store.insert(&book("Emma Woodhouse", 1.0, vec![])).unwrap();
        store.insert(&book("Emma", 2.0, vec![])).unwrap();

        let found = store.find_by_title_contains("Emma").unwrap().unwrap();
        assert_eq!(found.title, "Emma Woodhouse");
    }

    #[test]
    fn test_insert_rejects_duplicate_exact_title() {
        let store = SqliteCatalog::in_memory().unwrap();
        store.insert(&book("Emma", 1.0, vec![])).unwrap();
        assert!(store.insert(&book("Emma", 2.0, vec![])).is_err());
    }

    #[test]
    fn test_insert_returns_stored_copy() {
        let store = SqliteCatalog::in_memory().unwrap();
        let stored = store
            .insert(&book("Emma", 3.5, vec![Language::English, Language::French]))
            .unwrap();

        assert_eq!(stored.title, "Emma");
        assert_eq!(stored.downloads, 3.5);
        assert_eq!(stored.languages, vec![Language::English, Language::French]);
    }

    #[test]
    fn test_language_set_round_trips_in_order() {
        let store = SqliteCatalog::in_memory().unwrap();
        let languages = vec![Language::Unknown, Language::Latin, Language::Dutch];
        store.insert(&book("Codex", 1.0, languages.clone())).unwrap();

        let found = store.find_by_title_contains("Codex").unwrap().unwrap();
        assert_eq!(found.languages, languages);
    }

    // ==================== Listing Tests ====================

    #[test]
    fn test_all_preserves_insertion_order() {
        let store = SqliteCatalog::in_memory().unwrap();
        store.insert(&book("First", 1.0, vec![])).unwrap();
        store.insert(&book("Second", 2.0, vec![])).unwrap();
        store.insert(&book("Third", 3.0, vec![])).unwrap();

        let titles: Vec<String> = store.all().unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_all_on_empty_store() {
        let store = SqliteCatalog::in_memory().unwrap();
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn test_by_language_filters_and_keeps_order() {
        let store = SqliteCatalog::in_memory().unwrap();
        store
            .insert(&book("Quixote", 1.0, vec![Language::Spanish]))
            .unwrap();
        store
            .insert(&book("Emma", 2.0, vec![Language::English]))
            .unwrap();
        store
            .insert(&book("Bilingual", 3.0, vec![Language::English, Language::Spanish]))
            .unwrap();

        let titles: Vec<String> = store
            .by_language(Language::Spanish)
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Quixote", "Bilingual"]);
    }

    #[test]
    fn test_by_language_empty_result_is_ok() {
        let store = SqliteCatalog::in_memory().unwrap();
        store
            .insert(&book("Emma", 1.0, vec![Language::English]))
            .unwrap();
        assert!(store.by_language(Language::Japanese).unwrap().is_empty());
    }

    // ==================== Author Query Tests ====================

    #[test]
    fn test_authors_alive_in_year() {
        let store = SqliteCatalog::in_memory().unwrap();
        let mut quixote = book("Don Quixote", 1.0, vec![Language::Spanish]);
        quixote.authors = vec![Author {
            name: "Cervantes Saavedra, Miguel de".to_string(),
            birth_year: Some(1547),
            death_year: Some(1616),
        }];
        store.insert(&quixote).unwrap();

        let alive = store.authors_alive_in_year(1600).unwrap();
        assert_eq!(alive.len(), 1);
        assert_eq!(alive[0].name, "Cervantes Saavedra, Miguel de");

        assert!(store.authors_alive_in_year(1500).unwrap().is_empty());
        assert!(store.authors_alive_in_year(1700).unwrap().is_empty());
    }

    #[test]
    fn test_authors_with_missing_years_never_match() {
        let store = SqliteCatalog::in_memory().unwrap();
        let mut b = book("Mystery", 1.0, vec![]);
        b.authors = vec![
            Author {
                name: "No Death".to_string(),
                birth_year: Some(1547),
                death_year: None,
            },
            Author {
                name: "No Birth".to_string(),
                birth_year: None,
                death_year: Some(1616),
            },
        ];
        store.insert(&b).unwrap();

        assert!(store.authors_alive_in_year(1600).unwrap().is_empty());
    }

    #[test]
    fn test_authors_round_trip_with_book() {
        let store = SqliteCatalog::in_memory().unwrap();
        let mut b = book("Collab", 1.0, vec![]);
        b.authors = vec![
            Author {
                name: "First, Author".to_string(),
                birth_year: Some(1900),
                death_year: Some(1980),
            },
            Author {
                name: "Second, Author".to_string(),
                birth_year: None,
                death_year: None,
            },
        ];
        store.insert(&b).unwrap();

        let stored = store.find_by_title_contains("Collab").unwrap().unwrap();
        assert_eq!(stored.authors.len(), 2);
        assert_eq!(stored.authors[0].name, "First, Author");
        assert_eq!(stored.authors[1].birth_year, None);
    }
}
