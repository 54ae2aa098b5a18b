//! Route registration and middleware layering.
//!
//! Read endpoints (list, blob fetch, health) are public; everything that
//! mutates passes the Access gate first. The gate is attached per method so
//! public and protected verbs can share a path.

use crate::auth::{require_access, AccessState};
use crate::error::HttpAppError;
use crate::handlers;
use crate::state::AppState;
use axum::extract::{DefaultBodyLimit, Request};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::Router;
use pholio_core::{AppError, Config};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let access_state = AccessState::from_config(config.clone());
    let gate = axum::middleware::from_fn_with_state(access_state, require_access);

    // Leave validation headroom above the file cap so an oversized upload is
    // rejected with the validator's message rather than a raw 413
    let body_limit = config.max_file_size_bytes * 2;

    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/images",
            get(handlers::photo_list::list_photos).merge(
                post(handlers::photo_upload::upload_photo).layer(gate.clone()),
            ),
        )
        .route(
            "/api/images/batch",
            post(handlers::photo_upload::upload_photos_batch).layer(gate.clone()),
        )
        .route(
            "/api/images/{id}",
            get(handlers::photo_get::get_photo).merge(
                patch(handlers::photo_patch::patch_photo)
                    .delete(handlers::photo_delete::delete_photo)
                    .layer(gate),
            ),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(axum::middleware::from_fn(envelope_payload_too_large))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

/// The body-limit layer rejects with a bare 413; rewrite that into the JSON
/// error envelope the rest of the API speaks. Handler-produced 413s already
/// carry a JSON body and pass through untouched.
async fn envelope_payload_too_large(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let already_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !already_json {
        return HttpAppError(AppError::PayloadTooLarge(
            "Request body exceeds the upload size limit".to_string(),
        ))
        .into_response();
    }
    response
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();
        let origins = origins.map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };
    Ok(cors)
}
