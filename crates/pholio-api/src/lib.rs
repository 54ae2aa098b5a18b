//! Pholio API Library
//!
//! This crate provides the HTTP API handlers, middleware, and application setup.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::ErrorResponse;
pub use services::PhotoUploadService;
pub use state::AppState;
