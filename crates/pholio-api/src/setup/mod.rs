//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from
//! main.rs for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use pholio_core::Config;
use pholio_db::PgPhotoStore;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let blobs = storage::setup_storage(&config).await?;

    let photos = Arc::new(PgPhotoStore::new(pool));
    let state = Arc::new(AppState::new(config.clone(), blobs, photos));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
