//! Database module for the document store.
//!
//! SQLite holds one table per collection; each row is a JSON document body
//! keyed by its external id.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::{Backup, Contact, Document, MyLink, Product};

/// Open the connection pool and create any missing collections.
pub async fn init_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(path) = sqlite_file_path(database_url) {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    create_collections(&pool).await?;

    Ok(pool)
}

/// The on-disk file named by a `sqlite:` URL, if it names one.
fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}

async fn create_collections(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for collection in [
        Contact::COLLECTION,
        Product::COLLECTION,
        Backup::COLLECTION,
        MyLink::COLLECTION,
    ] {
        create_collection(pool, collection).await?;
    }
    Ok(())
}

/// Create a collection table. `seq` is the store-internal identifier and
/// never leaves the database; `id` is the external one.
async fn create_collection(pool: &SqlitePool, collection: &str) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {collection} (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            sort_key TEXT,
            body TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{collection}_sort_key ON {collection}(sort_key);"
    ))
    .execute(pool)
    .await?;

    Ok(())
}
