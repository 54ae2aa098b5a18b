//! HTTP handlers

pub mod health;
pub mod photo_delete;
pub mod photo_get;
pub mod photo_list;
pub mod photo_patch;
pub mod photo_upload;
