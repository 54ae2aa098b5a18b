//! Application services

pub mod upload;

pub use upload::PhotoUploadService;
