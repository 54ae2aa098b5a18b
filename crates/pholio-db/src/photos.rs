//! Photo metadata repository.
//!
//! One row per stored photo, keyed by the storage-derived id. Columns map
//! 1:1 onto [`PhotoMetadata`] with EXIF fields denormalized into the same
//! row; NULL columns surface as `None` and are omitted from API JSON.

use async_trait::async_trait;
use pholio_core::models::{ExifData, PhotoMetadata, PhotoUpdate};
use pholio_core::AppError;
use sqlx::{FromRow, PgPool, Postgres};

/// Storage-agnostic interface to the metadata store.
///
/// The HTTP layer holds an `Arc<dyn PhotoStore>`, so tests can swap in an
/// in-memory implementation without a database.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Persist a new photo row. The id must be unique; inserting a duplicate
    /// id is a database error.
    async fn insert(&self, photo: &PhotoMetadata) -> Result<(), AppError>;

    /// All photos, newest upload first.
    async fn list(&self) -> Result<Vec<PhotoMetadata>, AppError>;

    /// Look up one photo by id.
    async fn get(&self, id: &str) -> Result<Option<PhotoMetadata>, AppError>;

    /// Apply a partial update and return the updated row, or `None` when the
    /// id does not exist. Absent update fields leave columns untouched.
    async fn update(&self, id: &str, update: &PhotoUpdate)
        -> Result<Option<PhotoMetadata>, AppError>;

    /// Delete a photo row. Returns whether a row existed; deleting a missing
    /// id is not an error.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

/// Raw database row for the `photos` table.
#[derive(Debug, Clone, FromRow)]
pub struct PhotoRow {
    pub id: String,
    pub filename: String,
    pub original_filename: String,
    pub uploaded_at: i64,
    pub mime_type: String,
    pub size: i64,
    pub lqip: Option<String>,
    pub description: Option<String>,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub exposure_time: Option<String>,
    pub aperture: Option<String>,
    pub iso: Option<String>,
    pub focal_length: Option<String>,
    pub taken_at: Option<i64>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl PhotoRow {
    pub fn into_metadata(self) -> PhotoMetadata {
        PhotoMetadata {
            id: self.id,
            filename: self.filename,
            original_filename: self.original_filename,
            uploaded_at: self.uploaded_at,
            mime_type: self.mime_type,
            size: self.size,
            lqip: self.lqip,
            description: self.description,
            exif: ExifData {
                camera_make: self.camera_make,
                camera_model: self.camera_model,
                exposure_time: self.exposure_time,
                aperture: self.aperture,
                iso: self.iso,
                focal_length: self.focal_length,
                taken_at: self.taken_at,
                latitude: self.latitude,
                longitude: self.longitude,
            },
        }
    }
}

/// Postgres-backed photo repository
#[derive(Clone)]
pub struct PgPhotoStore {
    pool: PgPool,
}

impl PgPhotoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoStore for PgPhotoStore {
    #[tracing::instrument(
        skip(self, photo),
        fields(db.table = "photos", db.operation = "insert", photo_id = %photo.id)
    )]
    async fn insert(&self, photo: &PhotoMetadata) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO photos (
                id, filename, original_filename, uploaded_at, mime_type, size,
                lqip, description,
                camera_make, camera_model, exposure_time, aperture, iso,
                focal_length, taken_at, latitude, longitude
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(&photo.id)
        .bind(&photo.filename)
        .bind(&photo.original_filename)
        .bind(photo.uploaded_at)
        .bind(&photo.mime_type)
        .bind(photo.size)
        .bind(&photo.lqip)
        .bind(&photo.description)
        .bind(&photo.exif.camera_make)
        .bind(&photo.exif.camera_model)
        .bind(&photo.exif.exposure_time)
        .bind(&photo.exif.aperture)
        .bind(&photo.exif.iso)
        .bind(&photo.exif.focal_length)
        .bind(photo.exif.taken_at)
        .bind(&photo.exif.latitude)
        .bind(&photo.exif.longitude)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<PhotoMetadata>, AppError> {
        let rows: Vec<PhotoRow> = sqlx::query_as::<Postgres, PhotoRow>(
            "SELECT * FROM photos ORDER BY uploaded_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PhotoRow::into_metadata).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<PhotoMetadata>, AppError> {
        let row: Option<PhotoRow> =
            sqlx::query_as::<Postgres, PhotoRow>("SELECT * FROM photos WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(PhotoRow::into_metadata))
    }

    #[tracing::instrument(
        skip(self, update),
        fields(db.table = "photos", db.operation = "update", photo_id = %id)
    )]
    async fn update(
        &self,
        id: &str,
        update: &PhotoUpdate,
    ) -> Result<Option<PhotoMetadata>, AppError> {
        let row: Option<PhotoRow> = sqlx::query_as::<Postgres, PhotoRow>(
            r#"
            UPDATE photos
            SET description = COALESCE($2, description)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PhotoRow::into_metadata))
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "photos", db.operation = "delete", photo_id = %id)
    )]
    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_to_metadata_carries_exif_fields() {
        let row = PhotoRow {
            id: "1697040000000-cat.jpg".to_string(),
            filename: "1697040000000-cat.jpg".to_string(),
            original_filename: "cat.jpg".to_string(),
            uploaded_at: 1_697_040_000_123,
            mime_type: "image/jpeg".to_string(),
            size: 2048,
            lqip: Some("1234".to_string()),
            description: None,
            camera_make: Some("Canon".to_string()),
            camera_model: None,
            exposure_time: Some("1/250".to_string()),
            aperture: None,
            iso: Some("400".to_string()),
            focal_length: None,
            taken_at: Some(1_686_818_600_000),
            latitude: None,
            longitude: None,
        };

        let photo = row.into_metadata();
        assert_eq!(photo.id, "1697040000000-cat.jpg");
        assert_eq!(photo.lqip.as_deref(), Some("1234"));
        assert_eq!(photo.exif.camera_make.as_deref(), Some("Canon"));
        assert_eq!(photo.exif.iso.as_deref(), Some("400"));
        assert_eq!(photo.exif.taken_at, Some(1_686_818_600_000));
        assert!(photo.description.is_none());
        assert!(photo.exif.camera_model.is_none());
    }
}
