//! Backup API endpoints beyond the shared collection handlers.

use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::models::{Backup, Contact, Product, Record};
use crate::AppState;

/// POST /api/backups/snapshot - Store a backup of the live collections.
///
/// The two collections are read one after the other, so the snapshot is not
/// atomic across them.
pub async fn create_snapshot(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Record<Backup>>), AppError> {
    let contacts = state.repo.list::<Contact>().await?;
    let products = state.repo.list::<Product>().await?;

    let backup = Backup::snapshot(&contacts, &products)?;
    let record = state
        .repo
        .insert(backup)
        .await
        .map_err(AppError::into_write_failure)?;

    tracing::info!(
        contacts = record.document.contact_count,
        products = record.document.product_count,
        "Snapshot backup created"
    );

    Ok((StatusCode::CREATED, Json(record)))
}
