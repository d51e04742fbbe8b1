//! Payment link repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use paylockr_core::error::{AppError, ErrorKind};
use paylockr_core::result::AppResult;
use paylockr_core::types::LinkId;
use paylockr_entity::PaymentLink;

use crate::stores::LinkStore;

/// Repository for payment link rows.
#[derive(Debug, Clone)]
pub struct LinkRepository {
    pool: PgPool,
}

impl LinkRepository {
    /// Create a new link repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkStore for LinkRepository {
    async fn find_active_by_code(&self, code: &str) -> AppResult<Option<PaymentLink>> {
        sqlx::query_as::<_, PaymentLink>(
            "SELECT * FROM payment_links WHERE link_code = $1 AND is_active = TRUE",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find link by code", e)
        })
    }

    async fn find_by_id(&self, id: LinkId) -> AppResult<Option<PaymentLink>> {
        sqlx::query_as::<_, PaymentLink>("SELECT * FROM payment_links WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find link", e))
    }

    async fn create(&self, link: &PaymentLink) -> AppResult<PaymentLink> {
        sqlx::query_as::<_, PaymentLink>(
            "INSERT INTO payment_links (id, link_code, file_id, seller_id, custom_price, \
             custom_message, expires_at, max_downloads, current_downloads, is_active, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(link.id)
        .bind(&link.link_code)
        .bind(link.file_id)
        .bind(link.seller_id)
        .bind(link.custom_price)
        .bind(&link.custom_message)
        .bind(link.expires_at)
        .bind(link.max_downloads)
        .bind(link.current_downloads)
        .bind(link.is_active)
        .bind(link.created_at)
        .bind(link.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create link", e))
    }
}
