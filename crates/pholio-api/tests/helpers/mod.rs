//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pholio-api --test photos_test`.
//! The full HTTP surface runs against a tempdir blob store and an in-memory
//! metadata store, so no database is required.

pub mod fixtures;
pub mod store;

use axum_test::TestServer;
use pholio_api::setup::routes::setup_routes;
use pholio_api::state::AppState;
use pholio_core::Config;
use pholio_db::PhotoStore;
use pholio_storage::{BlobStore, LocalStorage};
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server plus owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Development-mode configuration: auth bypassed, default upload policy.
pub fn test_config() -> Config {
    Config {
        server_port: 0,
        environment: "development".to_string(),
        cors_origins: vec!["*".to_string()],
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 5,
        local_storage_path: String::new(),
        max_file_size_bytes: 10 * 1024 * 1024,
        allowed_content_types: vec![
            "image/jpeg".to_string(),
            "image/png".to_string(),
            "image/webp".to_string(),
        ],
        max_image_dimension: 3840,
        parse_exif_client_side: false,
        access_team_domain: None,
        access_policy_aud: None,
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_config(test_config()).await
}

pub async fn setup_test_app_with_config(config: Config) -> TestApp {
    build_test_app(config, Arc::new(store::InMemoryPhotoStore::default())).await
}

/// Like [`setup_test_app`] but hands back the metadata store so a test can
/// inject failures.
pub async fn setup_test_app_with_store() -> (TestApp, Arc<store::InMemoryPhotoStore>) {
    let photos = Arc::new(store::InMemoryPhotoStore::default());
    let app = build_test_app(test_config(), photos.clone()).await;
    (app, photos)
}

async fn build_test_app(mut config: Config, photos: Arc<store::InMemoryPhotoStore>) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    config.local_storage_path = temp_dir.path().to_string_lossy().into_owned();

    let storage: Arc<dyn BlobStore> = Arc::new(
        LocalStorage::new(&config.local_storage_path)
            .await
            .expect("Failed to create local storage"),
    );
    let photos: Arc<dyn PhotoStore> = photos;

    let state = Arc::new(AppState::new(config.clone(), storage, photos));
    let router = setup_routes(&config, state).expect("Failed to build router");

    TestApp {
        server: TestServer::new(router).expect("Failed to start test server"),
        _temp_dir: temp_dir,
    }
}
