//! Pholio Core Library
//!
//! This crate provides core domain models, error types, and configuration
//! that are shared across all Pholio components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    ExifData, PhotoMetadata, PhotoResponse, PhotoUpdate, UploadedFile, UploadedFileResult,
};
