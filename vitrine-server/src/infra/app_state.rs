use std::{fmt, sync::Arc};

use anyhow::Context;
use tracing::info;
use vitrine_core::{
    CatalogDatabase, FileStore, ImageService, LocalFileStore, TextRenderer,
};

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub images: Arc<ImageService>,
    pub database: CatalogDatabase,
    pub files: Arc<LocalFileStore>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Connect the catalog, apply migrations, prepare the upload directory
    /// and assemble the gallery service.
    pub async fn initialize(config: Config) -> anyhow::Result<Self> {
        let database = CatalogDatabase::connect(&config.database.url)
            .await
            .context("failed to open catalog database")?;
        database
            .initialize_schema()
            .await
            .context("database migration failed")?;

        let urls = config
            .storage
            .url_mapper()
            .context("invalid public url configuration")?;
        let files = Arc::new(LocalFileStore::new(
            config.storage.upload_root.clone(),
            urls,
        ));
        files
            .ensure_root()
            .await
            .context("failed to create upload directory")?;

        let renderer = TextRenderer::load(config.annotate.font_path.as_deref());
        info!(
            upload_root = %config.storage.upload_root.display(),
            naming = %config.storage.naming,
            rejection = %config.storage.rejection,
            vector_font = renderer.is_vector(),
            "gallery storage ready"
        );

        let images = Arc::new(ImageService::new(
            database.catalog(),
            files.clone() as Arc<dyn FileStore>,
            Arc::new(renderer),
            config.storage.upload_options(),
        ));

        Ok(Self {
            images,
            database,
            files,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
