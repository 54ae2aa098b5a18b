use std::sync::Arc;

use axum::{extract::State, Json};
use pholio_core::models::{PhotoListData, PhotoListResponse, PhotoResponse};

use crate::error::HttpAppError;
use crate::state::AppState;

/// List all photos, newest first, each with its derived serving URL.
pub async fn list_photos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PhotoListResponse>, HttpAppError> {
    let photos = state.photos.list().await.map_err(HttpAppError::from)?;

    let photos: Vec<PhotoResponse> = photos.into_iter().map(PhotoResponse::from_metadata).collect();

    Ok(Json(PhotoListResponse {
        success: true,
        data: PhotoListData {
            count: photos.len(),
            photos,
        },
    }))
}
