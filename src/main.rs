use std::io::Write;

use anyhow::Result;
use tracing::{info, warn};

use literato::config::Config;
use literato::error::CatalogError;
use literato::gutendex;
use literato::ingest::{self, IngestOutcome};
use literato::language::ALL_LANGUAGES;
use literato::model::{Author, Book};
use literato::query;
use literato::store::{CatalogStore, SqliteCatalog};

const MENU: &str = "\
--- LITERATO ---
  [1] Search a book by title and catalog it
  [2] List catalogued books
  [3] List catalogued authors
  [4] Authors alive in a given year
  [5] Books by language
  [6] Most downloaded books
  [7] Download statistics
  [0] Quit";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (absent in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("literato=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let store = SqliteCatalog::new(&config.database_path)?;
    info!("Catalog opened at {}", config.database_path);

    let client = reqwest::Client::new();

    loop {
        println!("\n{}", MENU);
        let choice = prompt("Select an option: ")?;

        match choice.trim() {
            "1" => {
                if let Err(e) = search_and_catalog(&client, &config, &store).await {
                    warn!("Search failed: {:#}", e);
                }
            }
            "2" => list_books(&store)?,
            "3" => list_authors(&store)?,
            "4" => authors_alive(&store)?,
            "5" => books_by_language(&store)?,
            "6" => top_books(&store, config.top_limit)?,
            "7" => statistics(&store)?,
            "0" => {
                println!("Bye.");
                break;
            }
            other => println!("Unrecognized option '{}'.", other),
        }
    }

    Ok(())
}

async fn search_and_catalog(
    client: &reqwest::Client,
    config: &Config,
    store: &impl CatalogStore,
) -> Result<()> {
    let title = prompt("Book title: ")?;
    let title = title.trim();
    if title.is_empty() {
        println!("Nothing to search.");
        return Ok(());
    }

    let candidates = gutendex::search(client, &config.gutendex_base_url, title).await?;

    match ingest::ingest_by_title_search(store, title, &candidates)? {
        IngestOutcome::Inserted(book) => {
            println!("Catalogued:");
            print_book(&book);
        }
        IngestOutcome::AlreadyExists(book) => {
            println!("Already in the catalog:");
            print_book(&book);
        }
        IngestOutcome::NotFound => println!("No result matched '{}'.", title),
    }
    Ok(())
}

fn list_books(store: &impl CatalogStore) -> Result<()> {
    let books = store.all()?;
    if books.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }
    for book in &books {
        print_book(book);
    }
    Ok(())
}

fn list_authors(store: &impl CatalogStore) -> Result<()> {
    let authors = query::all_authors(store)?;
    if authors.is_empty() {
        println!("No authors catalogued yet.");
        return Ok(());
    }
    for author in &authors {
        print_author(author);
    }
    Ok(())
}

fn authors_alive(store: &impl CatalogStore) -> Result<()> {
    let input = prompt("Year: ")?;
    let year: i32 = match input.trim().parse() {
        Ok(year) => year,
        Err(_) => {
            println!("'{}' is not a year.", input.trim());
            return Ok(());
        }
    };

    let authors = query::authors_alive_in_year(store, year)?;
    if authors.is_empty() {
        println!("No catalogued author was alive in {}.", year);
    } else {
        for author in &authors {
            print_author(author);
        }
    }
    Ok(())
}

fn books_by_language(store: &impl CatalogStore) -> Result<()> {
    let codes: Vec<&str> = ALL_LANGUAGES
        .iter()
        .filter(|l| l.code() != "unknown")
        .map(|l| l.code())
        .collect();
    let input = prompt(&format!("Language code ({}): ", codes.join(", ")))?;

    match query::books_by_language(store, input.trim()) {
        Ok(books) if books.is_empty() => println!("No books in that language."),
        Ok(books) => {
            for book in &books {
                print_book(book);
            }
        }
        Err(e) => match e.downcast::<CatalogError>() {
            Ok(CatalogError::InvalidLanguageCode(code)) => {
                println!("Unrecognized language code: '{}'.", code);
            }
            Ok(other) => return Err(other.into()),
            Err(e) => return Err(e),
        },
    }
    Ok(())
}

fn top_books(store: &impl CatalogStore, limit: usize) -> Result<()> {
    let books = query::top_by_downloads(store, limit)?;
    if books.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }
    for (rank, book) in books.iter().enumerate() {
        println!("#{} ({} downloads)", rank + 1, book.downloads);
        print_book(book);
    }
    Ok(())
}

fn statistics(store: &impl CatalogStore) -> Result<()> {
    let stats = query::download_statistics(store)?;
    println!("Books catalogued: {}", stats.count);
    match (stats.average, stats.max, stats.min) {
        (Some(average), Some(max), Some(min)) => {
            println!("Average downloads: {:.1}", average);
            println!("Most downloaded:   {:.1}", max);
            println!("Least downloaded:  {:.1}", min);
        }
        _ => println!("No download data yet."),
    }
    Ok(())
}

fn print_book(book: &Book) {
    let authors = if book.authors.is_empty() {
        "Unknown".to_string()
    } else {
        book.authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let languages = book
        .languages
        .iter()
        .map(|l| l.display_name())
        .collect::<Vec<_>>()
        .join(", ");

    println!("  ----------------------------------");
    println!("  Title:     {}", book.title);
    println!("  Author:    {}", authors);
    println!("  Languages: {}", languages);
    println!("  Downloads: {:.0}", book.downloads);
}

fn print_author(author: &Author) {
    let birth = author
        .birth_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let death = author
        .death_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "alive/unknown".to_string());
    println!("  {} ({} - {})", author.name, birth, death);
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line)
}
