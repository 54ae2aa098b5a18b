use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use pholio_storage::keys;
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// Delete a photo: row first, then blob.
///
/// Both sides tolerate an already-absent target, so the operation is
/// idempotent and a retry after a partial failure converges.
pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let row_existed = state.photos.delete(&id).await.map_err(HttpAppError::from)?;

    let storage_key = keys::key_from_id(&id);
    state
        .storage
        .delete(&storage_key)
        .await
        .map_err(HttpAppError::from)?;

    tracing::info!(photo_id = %id, row_existed, "Photo deleted");

    Ok(Json(DeleteResponse {
        success: true,
        message: "Image deleted successfully".to_string(),
    }))
}
