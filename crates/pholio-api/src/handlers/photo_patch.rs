use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use pholio_core::models::{PhotoResponse, PhotoUpdate};
use pholio_core::AppError;

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Partially update a photo's metadata. Absent fields are left untouched;
/// the blob is never modified. Returns the full updated row.
pub async fn patch_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(update): ValidatedJson<PhotoUpdate>,
) -> Result<Json<PhotoResponse>, HttpAppError> {
    let updated = state
        .photos
        .update(&id, &update)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| HttpAppError(AppError::NotFound("Photo not found".to_string())))?;

    tracing::info!(photo_id = %id, "Photo metadata updated");

    Ok(Json(PhotoResponse::from_metadata(updated)))
}
