use tracing::{debug, error, info, warn};

use super::{ImageService, NamingStrategy, PublishedImage, RejectionPolicy};
use crate::{
    domain::{
        image::{ImageRecord, NewImage},
        ordering::OrderingPolicy,
    },
    error::{GalleryError, Result},
    storage::keys::{extension_of, identity_key},
};

/// One file of an upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Client-supplied name; only its extension is used.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

impl ImageService {
    /// Store every accepted file and append it to the catalog.
    ///
    /// Files are processed in submission order and numbered from the current
    /// catalog count. Each file is its own unit: a failure stops the batch
    /// and is returned, files stored before it stay stored.
    pub async fn upload(
        &self,
        files: Vec<UploadFile>,
    ) -> Result<Vec<PublishedImage>> {
        if files.is_empty() {
            return Err(GalleryError::Validation(
                "no files were provided".into(),
            ));
        }

        let mut accepted = Vec::with_capacity(files.len());
        for file in files {
            match extension_of(&file.file_name)
                .filter(|ext| self.options.accepts(ext))
            {
                Some(extension) => accepted.push((file, extension)),
                None => match self.options.rejection {
                    RejectionPolicy::Skip => {
                        debug!(file = %file.file_name, "skipping unsupported upload");
                    }
                    RejectionPolicy::Reject => {
                        return Err(GalleryError::Validation(format!(
                            "unsupported file type: '{}' (accepted: {})",
                            file.file_name,
                            self.accepted_list()
                        )));
                    }
                },
            }
        }

        let base = self.catalog.count().await?;
        let mut stored = Vec::with_capacity(accepted.len());
        for (index, (file, extension)) in accepted.into_iter().enumerate() {
            let order = OrderingPolicy::append_order(base, index);
            let record = match self.options.naming {
                NamingStrategy::Random => {
                    self.store_random(&file, &extension, order).await?
                }
                NamingStrategy::Identity => {
                    self.store_identity(&file, &extension, order).await?
                }
            };
            info!(image_id = %record.id, key = %record.filename, order, "image uploaded");
            stored.push(self.publish(record));
        }

        Ok(stored)
    }

    fn accepted_list(&self) -> String {
        self.options
            .accepted_extensions()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    async fn store_random(
        &self,
        file: &UploadFile,
        extension: &str,
        order: i64,
    ) -> Result<ImageRecord> {
        let key = self.files.put(&file.bytes, extension).await?;
        match self.catalog.insert(&NewImage::new(key.clone(), order)).await {
            Ok(record) => Ok(record),
            Err(err) => {
                self.discard_file(&key).await;
                Err(err)
            }
        }
    }

    async fn store_identity(
        &self,
        file: &UploadFile,
        extension: &str,
        order: i64,
    ) -> Result<ImageRecord> {
        let provisional = self.files.put(&file.bytes, extension).await?;
        let record = match self
            .catalog
            .insert(&NewImage::new(provisional.clone(), order))
            .await
        {
            Ok(record) => record,
            Err(err) => {
                self.discard_file(&provisional).await;
                return Err(err);
            }
        };

        let final_key = identity_key(record.id, extension);
        if let Err(err) = self.files.rename(&provisional, &final_key).await {
            // Nothing moved yet: undo the row and the provisional file.
            if let Err(undo) = self.catalog.delete(record.id).await {
                warn!(image_id = %record.id, error = %undo, "failed to roll back catalog row");
            }
            self.discard_file(&provisional).await;
            return Err(err);
        }

        // Rename and metadata update form one unit from here on.
        let mut finalized = record.clone();
        finalized.filename = final_key.clone();
        self.catalog.update(&finalized).await.map_err(|err| {
            error!(
                image_id = %record.id,
                provisional = %provisional,
                key = %final_key,
                error = %err,
                "upload finalization failed; catalog row references a moved file"
            );
            GalleryError::Finalization {
                id: record.id,
                key: final_key,
                reason: err.to_string(),
            }
        })
    }

    async fn discard_file(&self, key: &str) {
        if let Err(err) = self.files.delete(key).await {
            warn!(key = %key, error = %err, "failed to discard stored file");
        }
    }
}
