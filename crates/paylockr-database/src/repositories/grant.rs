//! Download grant repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use paylockr_core::error::{AppError, ErrorKind};
use paylockr_core::result::AppResult;
use paylockr_entity::DownloadGrant;

use crate::stores::GrantStore;

/// Repository for download grants.
#[derive(Debug, Clone)]
pub struct GrantRepository {
    pool: PgPool,
}

impl GrantRepository {
    /// Create a new grant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GrantStore for GrantRepository {
    async fn insert(&self, grant: &DownloadGrant) -> AppResult<DownloadGrant> {
        sqlx::query_as::<_, DownloadGrant>(
            "INSERT INTO download_grants (id, transaction_id, token, url, issued_at, \
             expires_at, consumed) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(grant.id)
        .bind(grant.transaction_id)
        .bind(&grant.token)
        .bind(&grant.url)
        .bind(grant.issued_at)
        .bind(grant.expires_at)
        .bind(grant.consumed)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create grant", e))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<DownloadGrant>> {
        sqlx::query_as::<_, DownloadGrant>("SELECT * FROM download_grants WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find grant by token", e)
            })
    }

    async fn consume(&self, token: &str) -> AppResult<Option<DownloadGrant>> {
        sqlx::query_as::<_, DownloadGrant>(
            "UPDATE download_grants SET consumed = TRUE \
             WHERE token = $1 AND consumed = FALSE RETURNING *",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to consume grant", e))
    }
}
