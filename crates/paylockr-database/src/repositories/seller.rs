//! Seller repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use paylockr_core::error::{AppError, ErrorKind};
use paylockr_core::result::AppResult;
use paylockr_core::types::SellerId;
use paylockr_entity::Seller;

use crate::stores::SellerStore;

/// Repository for seller accounts.
#[derive(Debug, Clone)]
pub struct SellerRepository {
    pool: PgPool,
}

impl SellerRepository {
    /// Create a new seller repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SellerStore for SellerRepository {
    async fn find_by_id(&self, id: SellerId) -> AppResult<Option<Seller>> {
        sqlx::query_as::<_, Seller>("SELECT * FROM sellers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find seller", e))
    }

    async fn create(&self, seller: &Seller) -> AppResult<Seller> {
        sqlx::query_as::<_, Seller>(
            "INSERT INTO sellers (id, email, display_name, plan, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(seller.id)
        .bind(&seller.email)
        .bind(&seller.display_name)
        .bind(seller.plan)
        .bind(seller.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create seller", e))
    }
}
