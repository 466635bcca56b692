use async_trait::async_trait;

use crate::{
    Result,
    domain::{
        image::{ImageId, ImageRecord, NewImage},
        ordering::OrderAssignment,
    },
};

/// Repository port for the single-table image catalog.
///
/// Adapters own connection handling; every call acquires a handle for its own
/// duration and releases it on all exit paths.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Insert a record and return it with its assigned id.
    async fn insert(&self, image: &NewImage) -> Result<ImageRecord>;

    async fn get(&self, id: ImageId) -> Result<Option<ImageRecord>>;

    /// All records ordered by `order` ascending, then `id` ascending.
    async fn list(&self) -> Result<Vec<ImageRecord>>;

    /// Replace the mutable fields (`filename`, `title`, `order`) of an
    /// existing record. Fails with `NotFound` when the id is absent.
    async fn update(&self, record: &ImageRecord) -> Result<ImageRecord>;

    /// Fails with `NotFound` when the id is absent.
    async fn delete(&self, id: ImageId) -> Result<()>;

    async fn count(&self) -> Result<i64>;

    /// Apply several order assignments as one unit.
    async fn set_orders(&self, assignments: &[OrderAssignment]) -> Result<()>;
}
