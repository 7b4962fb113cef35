//! Database repository for document CRUD operations.
//!
//! Every operation touches a single row of a single collection; nothing here
//! spans documents or collections.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{fields::iso_millis, Document, Record};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Close the pool, waiting for in-flight queries to finish.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// List a whole collection in its fixed order.
    pub async fn list<T: Document>(&self) -> Result<Vec<Record<T>>, AppError> {
        let sql = format!(
            "SELECT body, created_at, updated_at FROM {} ORDER BY sort_key {}, seq ASC",
            T::COLLECTION,
            T::SORT_ORDER.as_sql()
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(record_from_row::<T>).collect()
    }

    /// Insert a new document, generating its id if it has none.
    ///
    /// A duplicate id is rejected by the unique index and surfaces as a
    /// validation error.
    pub async fn insert<T: Document>(&self, mut document: T) -> Result<Record<T>, AppError> {
        let id = document.ensure_id().to_string();
        let now = Utc::now();
        document.ensure_timestamp(now);
        let stamp = iso_millis::format(&now);
        let body = serde_json::to_string(&document)?;

        sqlx::query(&format!(
            "INSERT INTO {} (id, sort_key, body, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            T::COLLECTION
        ))
        .bind(&id)
        .bind(document.sort_key())
        .bind(&body)
        .bind(&stamp)
        .bind(&stamp)
        .execute(&self.pool)
        .await?;

        tracing::debug!(collection = T::COLLECTION, %id, "Inserted document");

        Ok(Record {
            document,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the whole document stored under `id`.
    ///
    /// The path id wins over any id in the body, and a body without
    /// `timestamp` keeps the stored one. `createdAt` is kept and `updatedAt`
    /// refreshed. Nothing is created when `id` does not exist.
    pub async fn replace<T: Document>(&self, id: &str, mut document: T) -> Result<Record<T>, AppError> {
        document.set_id(id.to_string());
        if document.timestamp().is_none() {
            if let Some(stored) = self.fetch::<T>(id).await?.timestamp() {
                document.set_timestamp(stored);
            }
        }
        let now = Utc::now();
        document.ensure_timestamp(now);
        let body = serde_json::to_string(&document)?;

        let row = sqlx::query(&format!(
            "UPDATE {} SET sort_key = ?, body = ?, updated_at = ? WHERE id = ? RETURNING created_at",
            T::COLLECTION
        ))
        .bind(document.sort_key())
        .bind(&body)
        .bind(iso_millis::format(&now))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found::<T>)?;

        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        Ok(Record {
            document,
            created_at,
            updated_at: now,
        })
    }

    /// Delete the document stored under `id`.
    pub async fn delete<T: Document>(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", T::COLLECTION))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found::<T>());
        }

        tracing::debug!(collection = T::COLLECTION, %id, "Deleted document");
        Ok(())
    }

    async fn fetch<T: Document>(&self, id: &str) -> Result<T, AppError> {
        let row = sqlx::query(&format!("SELECT body FROM {} WHERE id = ?", T::COLLECTION))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found::<T>)?;

        let body: String = row.try_get("body")?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn not_found<T: Document>() -> AppError {
    AppError::NotFound(format!("{} not found", T::LABEL))
}

fn record_from_row<T: Document>(row: &SqliteRow) -> Result<Record<T>, AppError> {
    let body: String = row.try_get("body")?;
    Ok(Record {
        document: serde_json::from_str(&body)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::{Backup, Contact, Product};
    use serde_json::json;
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", temp_dir.path().join("repo.sqlite").display());
        let pool = init_database(&url).await.unwrap();
        (Repository::new(pool), temp_dir)
    }

    fn contact(name: Option<&str>) -> Contact {
        serde_json::from_value(json!({ "name": name, "purpose": "general" })).unwrap()
    }

    #[tokio::test]
    async fn test_list_sorts_by_name_with_absent_names_first() {
        let (repo, _dir) = repo().await;
        repo.insert(contact(Some("Meera"))).await.unwrap();
        repo.insert(contact(Some("Arun"))).await.unwrap();
        repo.insert(contact(None)).await.unwrap();

        let names: Vec<Option<String>> = repo
            .list::<Contact>()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.document.name)
            .collect();
        assert_eq!(
            names,
            vec![None, Some("Arun".to_string()), Some("Meera".to_string())]
        );
    }

    #[tokio::test]
    async fn test_backups_list_newest_first() {
        let (repo, _dir) = repo().await;
        for ts in ["2024-01-01T00:00:00.000Z", "2024-03-01T00:00:00.000Z", "2024-02-01T00:00:00.000Z"] {
            let backup: Backup = serde_json::from_value(json!({
                "timestamp": ts,
                "contacts": "[]",
                "products": "[]"
            }))
            .unwrap();
            repo.insert(backup).await.unwrap();
        }

        let stamps: Vec<String> = repo
            .list::<Backup>()
            .await
            .unwrap()
            .iter()
            .filter_map(|r| r.document.timestamp.as_ref().map(iso_millis::format))
            .collect();
        assert_eq!(
            stamps,
            vec![
                "2024-03-01T00:00:00.000Z",
                "2024-02-01T00:00:00.000Z",
                "2024-01-01T00:00:00.000Z"
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_id_is_a_validation_error() {
        let (repo, _dir) = repo().await;
        let mut first = contact(Some("A"));
        first.id = Some("contact_fixed".to_string());
        let second = first.clone();

        repo.insert(first).await.unwrap();
        let err = repo.insert(second).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_replace_keeps_created_at_and_path_id() {
        let (repo, _dir) = repo().await;
        let created = repo.insert(contact(Some("Old"))).await.unwrap();
        let id = created.document.id.clone().unwrap();

        let mut replacement = contact(Some("New"));
        replacement.id = Some("something_else".to_string());
        let replaced = repo.replace(&id, replacement).await.unwrap();

        assert_eq!(replaced.document.id.as_deref(), Some(id.as_str()));
        assert_eq!(
            iso_millis::format(&replaced.created_at),
            iso_millis::format(&created.created_at)
        );
        assert!(replaced.updated_at >= created.updated_at);

        let listed = repo.list::<Contact>().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].document.name.as_deref(), Some("New"));
    }

    #[tokio::test]
    async fn test_replace_without_timestamp_keeps_stored_one() {
        let (repo, _dir) = repo().await;
        let created: Contact = serde_json::from_value(json!({
            "name": "Old",
            "timestamp": "2024-01-01T00:00:00.000Z"
        }))
        .unwrap();
        let id = repo.insert(created).await.unwrap().document.id.unwrap();

        let replaced = repo.replace(&id, contact(Some("New"))).await.unwrap();
        assert_eq!(
            replaced.document.timestamp.as_ref().map(iso_millis::format).as_deref(),
            Some("2024-01-01T00:00:00.000Z")
        );

        let mut dated = contact(Some("Newer"));
        dated.timestamp = "2024-05-01T00:00:00Z".parse::<DateTime<Utc>>().ok();
        repo.replace(&id, dated).await.unwrap();

        let listed = repo.list::<Contact>().await.unwrap();
        assert_eq!(
            listed[0].document.timestamp.as_ref().map(iso_millis::format).as_deref(),
            Some("2024-05-01T00:00:00.000Z")
        );
    }

    #[tokio::test]
    async fn test_insert_stamps_missing_timestamp() {
        let (repo, _dir) = repo().await;
        let record = repo.insert(contact(Some("Asha"))).await.unwrap();
        assert_eq!(record.document.timestamp, Some(record.created_at));
    }

    #[tokio::test]
    async fn test_replace_and_delete_missing_id() {
        let (repo, _dir) = repo().await;
        let product: Product = serde_json::from_value(json!({ "productName": "Tea" })).unwrap();

        let err = repo.replace("product_missing", product).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Product not found"));
        assert!(repo.list::<Product>().await.unwrap().is_empty());

        let err = repo.delete::<Product>("product_missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
