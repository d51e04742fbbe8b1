//! File repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use paylockr_core::error::{AppError, ErrorKind};
use paylockr_core::result::AppResult;
use paylockr_core::types::FileId;
use paylockr_entity::File;

use crate::stores::FileStore;

/// Repository for protected file rows.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn create(&self, file: &File) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, seller_id, title, description, price, file_size, \
             file_type, storage_path, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(file.id)
        .bind(file.seller_id)
        .bind(&file.title)
        .bind(&file.description)
        .bind(file.price)
        .bind(file.file_size)
        .bind(&file.file_type)
        .bind(&file.storage_path)
        .bind(file.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }
}
