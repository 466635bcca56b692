use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use crate::{
    database::ports::catalog::CatalogRepository,
    domain::{
        image::{ImageId, ImageRecord, NewImage},
        ordering::OrderAssignment,
    },
    error::{GalleryError, Result},
};

const SELECT_COLUMNS: &str = "SELECT id, filename, title, ord, created_at FROM images";

#[derive(Clone, Debug)]
pub struct SqliteCatalogRepository {
    pool: SqlitePool,
}

impl SqliteCatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for SqliteCatalogRepository {
    async fn insert(&self, image: &NewImage) -> Result<ImageRecord> {
        let record = sqlx::query_as::<_, ImageRecord>(
            r#"
            INSERT INTO images (filename, title, ord, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, filename, title, ord, created_at
            "#,
        )
        .bind(&image.filename)
        .bind(&image.title)
        .bind(image.order)
        .bind(image.created_at)
        .fetch_one(&self.pool)
        .await?;

        debug!(image_id = %record.id, key = %record.filename, "catalog row inserted");
        Ok(record)
    }

    async fn get(&self, id: ImageId) -> Result<Option<ImageRecord>> {
        let record = sqlx::query_as::<_, ImageRecord>(&format!(
            "{SELECT_COLUMNS} WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<ImageRecord>> {
        let records = sqlx::query_as::<_, ImageRecord>(&format!(
            "{SELECT_COLUMNS} ORDER BY ord ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn update(&self, record: &ImageRecord) -> Result<ImageRecord> {
        let updated = sqlx::query_as::<_, ImageRecord>(
            r#"
            UPDATE images
            SET filename = ?1, title = ?2, ord = ?3
            WHERE id = ?4
            RETURNING id, filename, title, ord, created_at
            "#,
        )
        .bind(&record.filename)
        .bind(&record.title)
        .bind(record.order)
        .bind(record.id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| GalleryError::image_not_found(record.id))
    }

    async fn delete(&self, id: ImageId) -> Result<()> {
        let result = sqlx::query("DELETE FROM images WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(GalleryError::image_not_found(id));
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM images")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn set_orders(&self, assignments: &[OrderAssignment]) -> Result<()> {
        if assignments.is_empty() {
            return Ok(());
        }

        // Dropping the transaction without commit rolls every row back.
        let mut tx = self.pool.begin().await?;
        for assignment in assignments {
            let result = sqlx::query("UPDATE images SET ord = ?1 WHERE id = ?2")
                .bind(assignment.order)
                .bind(assignment.id)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                return Err(GalleryError::image_not_found(assignment.id));
            }
        }
        tx.commit().await?;

        debug!(count = assignments.len(), "catalog order updated");
        Ok(())
    }
}
