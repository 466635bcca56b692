//! Gallery orchestration.
//!
//! [`ImageService`] is the only component that talks to both the catalog and
//! the file store. There is no transaction spanning the two, so each
//! operation orders its steps to leave the least harmful state behind on
//! failure and reports every failure to the caller.

pub mod options;
mod upload;

use std::{any::type_name_of_val, collections::HashSet, fmt, sync::Arc};

use serde::Serialize;
use tracing::info;
use url::Url;

pub use options::{NamingStrategy, RejectionPolicy, UploadOptions};
pub use upload::UploadFile;

use crate::{
    annotate::{self, Annotation, TextRenderer},
    database::ports::catalog::CatalogRepository,
    domain::{
        image::{ImageId, ImageRecord},
        ordering::OrderingPolicy,
    },
    error::{GalleryError, Result},
    storage::{file_store::FileStore, keys::extension_of},
};

/// A catalog record together with the URL its bytes are served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedImage {
    #[serde(flatten)]
    pub record: ImageRecord,
    pub url: Url,
}

#[derive(Clone)]
pub struct ImageService {
    catalog: Arc<dyn CatalogRepository>,
    files: Arc<dyn FileStore>,
    renderer: Arc<TextRenderer>,
    options: UploadOptions,
}

impl fmt::Debug for ImageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageService")
            .field("catalog", &type_name_of_val(self.catalog.as_ref()))
            .field("files", &type_name_of_val(self.files.as_ref()))
            .field("renderer", &self.renderer)
            .field("options", &self.options)
            .finish()
    }
}

impl ImageService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        files: Arc<dyn FileStore>,
        renderer: Arc<TextRenderer>,
        options: UploadOptions,
    ) -> Self {
        Self {
            catalog,
            files,
            renderer,
            options,
        }
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    fn publish(&self, record: ImageRecord) -> PublishedImage {
        let url = self.files.public_url(&record.filename);
        PublishedImage { record, url }
    }

    async fn require(&self, id: ImageId) -> Result<ImageRecord> {
        self.catalog
            .get(id)
            .await?
            .ok_or_else(|| GalleryError::image_not_found(id))
    }

    /// All images in display order.
    pub async fn list(&self) -> Result<Vec<PublishedImage>> {
        let records = self.catalog.list().await?;
        Ok(records.into_iter().map(|r| self.publish(r)).collect())
    }

    pub async fn get(&self, id: ImageId) -> Result<PublishedImage> {
        self.require(id).await.map(|r| self.publish(r))
    }

    /// Set or clear the title. Blank titles are stored as untitled.
    pub async fn rename(
        &self,
        id: ImageId,
        title: Option<String>,
    ) -> Result<PublishedImage> {
        let mut record = self.require(id).await?;
        record.title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let updated = self.catalog.update(&record).await?;
        info!(image_id = %id, title = ?updated.title, "image renamed");
        Ok(self.publish(updated))
    }

    /// Move the listed ids to positions `0..n` in the given order and return
    /// the fresh listing. Unlisted ids keep their current order.
    pub async fn reorder(&self, ids: &[ImageId]) -> Result<Vec<PublishedImage>> {
        let known: HashSet<ImageId> = self
            .catalog
            .list()
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();

        let plan = OrderingPolicy::plan_reorder(ids, &known)?;
        self.catalog.set_orders(&plan).await?;
        info!(count = plan.len(), total = known.len(), "images reordered");

        self.list().await
    }

    /// Burn `annotation` into the stored bytes. The first annotation of an
    /// untitled image also becomes its title.
    pub async fn annotate(
        &self,
        id: ImageId,
        annotation: Annotation,
    ) -> Result<PublishedImage> {
        annotation.validate()?;
        let mut record = self.require(id).await?;

        let extension = extension_of(&record.filename).ok_or_else(|| {
            GalleryError::StorageRead(format!(
                "stored key '{}' has no extension",
                record.filename
            ))
        })?;
        let format = annotate::format_for_extension(&extension)?;
        let source = self.files.open(&record.filename).await?;

        let renderer = Arc::clone(&self.renderer);
        let overlay = annotation.clone();
        let rendered = tokio::task::spawn_blocking(move || {
            annotate::render(&source, format, &renderer, &overlay)
        })
        .await
        .map_err(|err| {
            GalleryError::Internal(format!("annotation task failed: {err}"))
        })??;

        self.files.overwrite(&record.filename, &rendered).await?;

        if record.is_untitled() {
            record.title = Some(annotation.text.clone());
            record = self.catalog.update(&record).await?;
        }

        info!(image_id = %id, key = %record.filename, "image annotated");
        Ok(self.publish(record))
    }

    /// Remove the file, then the row. A crash in between leaves a row whose
    /// file is gone, which is detectable, rather than an unreferenced file.
    pub async fn delete(&self, id: ImageId) -> Result<()> {
        let record = self.require(id).await?;
        self.files.delete(&record.filename).await?;
        self.catalog.delete(id).await?;
        info!(image_id = %id, key = %record.filename, "image deleted");
        Ok(())
    }
}
