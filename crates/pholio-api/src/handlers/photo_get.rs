//! Serve stored photo bytes.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
};
use pholio_core::constants::PHOTO_CACHE_CONTROL;
use pholio_core::AppError;
use pholio_storage::keys;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Fetch one photo's blob by id.
///
/// Content-Type comes from the metadata row when one exists, falling back to
/// the id's file extension. Photos are immutable, hence the year-long cache
/// policy.
pub async fn get_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let storage_key = keys::key_from_id(&id);

    let data = state.storage.get(&storage_key).await.map_err(|e| {
        if matches!(e, pholio_storage::StorageError::NotFound(_)) {
            HttpAppError(AppError::NotFound("Image not found".to_string()))
        } else {
            HttpAppError::from(e)
        }
    })?;

    let content_type = match state.photos.get(&id).await {
        Ok(Some(photo)) => photo.mime_type,
        Ok(None) => content_type_from_id(&id).to_string(),
        Err(err) => {
            tracing::debug!(error = %err, %id, "Metadata lookup failed, serving extension-based content type");
            content_type_from_id(&id).to_string()
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from(data.len()),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(PHOTO_CACHE_CONTROL),
    );

    Ok((headers, data))
}

fn content_type_from_id(id: &str) -> &'static str {
    let extension = id.rsplit('.').next().unwrap_or_default().to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}
