use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::{
    error::{GalleryError, Result},
    storage::{
        keys::{ensure_valid_key, random_key},
        public_url::PublicUrlMapper,
    },
};

/// Port for the bytes behind catalog records.
///
/// Operations on one key are serialized by the underlying filesystem: new
/// keys are created exclusively, renames never clobber, and overwrites swap
/// the file in with a single rename.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write `bytes` under a fresh key ending in `extension`.
    async fn put(&self, bytes: &[u8], extension: &str) -> Result<String>;

    /// Move `old_key` to `new_key`. The destination must not exist.
    async fn rename(&self, old_key: &str, new_key: &str) -> Result<()>;

    /// Remove `key`; a missing file is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    async fn open(&self, key: &str) -> Result<Vec<u8>>;

    /// Replace the bytes of an existing key.
    async fn overwrite(&self, key: &str, bytes: &[u8]) -> Result<()>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Externally fetchable address for `key`. No I/O.
    fn public_url(&self, key: &str) -> Url;
}

/// Flat directory of image files, one file per key.
#[derive(Clone, Debug)]
pub struct LocalFileStore {
    root: PathBuf,
    urls: PublicUrlMapper,
}

impl LocalFileStore {
    pub fn new(root: PathBuf, urls: PublicUrlMapper) -> Self {
        Self { root, urls }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn urls(&self) -> &PublicUrlMapper {
        &self.urls
    }

    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|err| {
            GalleryError::StorageWrite(format!(
                "failed to create upload dir {:?}: {err}",
                self.root
            ))
        })
    }

    pub fn path_for_key(&self, key: &str) -> Result<PathBuf> {
        ensure_valid_key(key)?;
        Ok(self.root.join(key))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!(".{key}.tmp-{}", Uuid::new_v4().simple()))
    }

    async fn write_new(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn put(&self, bytes: &[u8], extension: &str) -> Result<String> {
        self.ensure_root().await?;

        loop {
            let key = random_key(extension);
            let path = self.path_for_key(&key)?;
            match self.write_new(&path, bytes).await {
                Ok(()) => {
                    debug!(key = %key, bytes = bytes.len(), "stored image bytes");
                    return Ok(key);
                }
                // Never overwrite: draw a new key on collision.
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => {
                    let _ = tokio::fs::remove_file(&path).await;
                    return Err(GalleryError::StorageWrite(format!(
                        "failed to write {:?}: {err}",
                        path
                    )));
                }
            }
        }
    }

    async fn rename(&self, old_key: &str, new_key: &str) -> Result<()> {
        let from = self.path_for_key(old_key)?;
        let to = self.path_for_key(new_key)?;

        // hard_link fails atomically when the destination exists.
        tokio::fs::hard_link(&from, &to).await.map_err(|err| {
            let reason = match err.kind() {
                ErrorKind::NotFound => "source is missing".to_string(),
                ErrorKind::AlreadyExists => {
                    "destination already exists".to_string()
                }
                _ => err.to_string(),
            };
            GalleryError::StorageRename(format!(
                "{old_key} -> {new_key}: {reason}"
            ))
        })?;

        if let Err(err) = tokio::fs::remove_file(&from).await {
            let _ = tokio::fs::remove_file(&to).await;
            return Err(GalleryError::StorageRename(format!(
                "{old_key} -> {new_key}: failed to drop source: {err}"
            )));
        }

        debug!(from = %old_key, to = %new_key, "renamed image file");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for_key(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(key = %key, "delete of missing file ignored");
                Ok(())
            }
            Err(err) => Err(GalleryError::StorageWrite(format!(
                "failed to delete {:?}: {err}",
                path
            ))),
        }
    }

    async fn open(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for_key(key)?;
        tokio::fs::read(&path).await.map_err(|err| {
            GalleryError::StorageRead(format!("failed to read {:?}: {err}", path))
        })
    }

    async fn overwrite(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for_key(key)?;
        if !self.exists(key).await? {
            return Err(GalleryError::NotFound(format!("storage key {key}")));
        }

        let tmp = self.temp_path(key);
        if let Err(err) = self.write_new(&tmp, bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(GalleryError::StorageWrite(format!(
                "failed to write temp file {:?}: {err}",
                tmp
            )));
        }

        tokio::fs::rename(&tmp, &path).await.map_err(|err| {
            GalleryError::StorageWrite(format!(
                "failed to move {:?} -> {:?}: {err}",
                tmp, path
            ))
        })
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.path_for_key(key)?;
        tokio::fs::try_exists(&path).await.map_err(|err| {
            GalleryError::StorageRead(format!("failed to stat {:?}: {err}", path))
        })
    }

    fn public_url(&self, key: &str) -> Url {
        self.urls.url_for(key)
    }
}
