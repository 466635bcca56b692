pub mod ports;
pub mod repositories;

use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tracing::info;

use crate::{
    MIGRATOR,
    database::{
        ports::catalog::CatalogRepository,
        repositories::catalog::SqliteCatalogRepository,
    },
    error::{GalleryError, Result},
};

/// Owner of the catalog connection pool.
///
/// Constructed once at process start and handed to the services that need
/// it; dropping the last clone closes the pool.
#[derive(Clone)]
pub struct CatalogDatabase {
    pool: SqlitePool,
    catalog: Arc<SqliteCatalogRepository>,
}

impl fmt::Debug for CatalogDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

impl CatalogDatabase {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(8);

        let connect_options = Self::build_connect_options(database_url)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                GalleryError::Internal(format!(
                    "Database connection failed: {e}"
                ))
            })?;

        info!(max_connections, "catalog pool initialized");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        let catalog = Arc::new(SqliteCatalogRepository::new(pool.clone()));
        Self { pool, catalog }
    }

    fn build_connect_options(database_url: &str) -> Result<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(database_url).map_err(
            |e| {
                GalleryError::Validation(format!(
                    "invalid database url '{database_url}': {e}"
                ))
            },
        )?;

        Ok(options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true))
    }

    /// Apply pending migrations.
    pub async fn initialize_schema(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        info!("catalog schema up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.catalog.clone()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
