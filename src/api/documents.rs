//! Collection endpoints shared by every record kind.
//!
//! Each handler is generic over the document type and instantiated once per
//! collection in the router.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::Payload;
use crate::errors::{AppError, MessageResponse};
use crate::models::{Document, Record};
use crate::AppState;

/// GET /api/{collection} - List the whole collection in its fixed order.
pub async fn list_documents<T: Document>(
    State(state): State<AppState>,
) -> Result<Json<Vec<Record<T>>>, AppError> {
    let records = state.repo.list::<T>().await?;
    Ok(Json(records))
}

/// POST /api/{collection} - Create a document, assigning an id if absent.
pub async fn create_document<T: Document>(
    State(state): State<AppState>,
    Payload(mut document): Payload<T>,
) -> Result<(StatusCode, Json<Record<T>>), AppError> {
    document.ensure_id();
    document.validate()?;

    let record = state
        .repo
        .insert(document)
        .await
        .map_err(AppError::into_write_failure)?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/{collection}/{id} - Replace a document by its external id.
///
/// Required fields are checked on create only; a replacement is stored as
/// decoded.
pub async fn update_document<T: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(document): Payload<T>,
) -> Result<Json<Record<T>>, AppError> {
    let record = state
        .repo
        .replace(&id, document)
        .await
        .map_err(AppError::into_write_failure)?;

    Ok(Json(record))
}

/// DELETE /api/{collection}/{id} - Delete a document by its external id.
pub async fn delete_document<T: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.delete::<T>(&id).await?;

    Ok(Json(MessageResponse::new(format!(
        "{} deleted successfully",
        T::LABEL
    ))))
}
