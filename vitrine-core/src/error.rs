use thiserror::Error;

use crate::domain::image::ImageId;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage write failed: {0}")]
    StorageWrite(String),

    #[error("Storage rename failed: {0}")]
    StorageRename(String),

    /// The file was moved to its identity-derived key but the catalog row
    /// still references the provisional key. Needs operator reconciliation.
    #[error(
        "Finalization failed for image {id} (file now at '{key}'): {reason}"
    )]
    Finalization {
        id: ImageId,
        key: String,
        reason: String,
    },

    #[error("Storage read failed: {0}")]
    StorageRead(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GalleryError {
    pub fn image_not_found(id: ImageId) -> Self {
        Self::NotFound(format!("image {id}"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<sqlx::migrate::MigrateError> for GalleryError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Internal(format!("migration failed: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
