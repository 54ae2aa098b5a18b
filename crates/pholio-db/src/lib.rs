//! Pholio Database Library
//!
//! Repositories for the metadata store. The HTTP layer depends only on the
//! [`PhotoStore`] trait so tests can substitute an in-memory implementation.

pub mod photos;

pub use photos::{PgPhotoStore, PhotoRow, PhotoStore};
