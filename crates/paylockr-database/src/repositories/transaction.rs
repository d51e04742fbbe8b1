//! Transaction repository implementation.
//!
//! The unique index on `external_reference` and the status-conditioned
//! UPDATEs here are what make transaction creation at-most-once and the
//! settlement state machine one-way.

use async_trait::async_trait;
use sqlx::PgPool;

use paylockr_core::error::{AppError, ErrorKind};
use paylockr_core::result::AppResult;
use paylockr_core::types::{LinkId, TransactionId};
use paylockr_entity::{NewTransaction, Transaction, TransactionStatus};

use crate::stores::{QuotaCharge, TransactionStore};

/// Repository for transaction rows and settlement transitions.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    /// Create a new transaction repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn insert_pending(&self, new: &NewTransaction) -> AppResult<Transaction> {
        sqlx::query_as::<_, Transaction>(
            "INSERT INTO transactions (payment_link_id, file_id, seller_id, base_amount, \
             base_currency, charged_amount, charged_currency, exchange_rate, fee_amount, \
             net_amount, external_reference, status, customer_email, customer_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'pending', $12, $13) \
             RETURNING *",
        )
        .bind(new.payment_link_id)
        .bind(new.file_id)
        .bind(new.seller_id)
        .bind(new.base_amount)
        .bind(new.base_currency)
        .bind(new.charged_amount)
        .bind(new.charged_currency)
        .bind(new.exchange_rate)
        .bind(new.fee_amount)
        .bind(new.net_amount)
        .bind(&new.external_reference)
        .bind(&new.customer_email)
        .bind(&new.customer_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::duplicate(
                format!("Transaction already exists for reference {}", new.external_reference),
            ),
            _ => AppError::with_source(ErrorKind::Database, "Failed to create transaction", e),
        })
    }

    async fn find_by_id(&self, id: TransactionId) -> AppResult<Option<Transaction>> {
        sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find transaction", e)
            })
    }

    async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Transaction>> {
        sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE external_reference = $1",
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find transaction by ref", e)
        })
    }

    async fn transition_from_pending(
        &self,
        reference: &str,
        to: TransactionStatus,
        gateway_tx_id: Option<&str>,
    ) -> AppResult<Option<Transaction>> {
        sqlx::query_as::<_, Transaction>(
            "UPDATE transactions \
             SET status = $2, gateway_tx_id = COALESCE($3, gateway_tx_id), updated_at = NOW() \
             WHERE external_reference = $1 AND status = 'pending' \
             RETURNING *",
        )
        .bind(reference)
        .bind(to)
        .bind(gateway_tx_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to transition transaction", e)
        })
    }

    async fn charge_download_quota(
        &self,
        id: TransactionId,
        link_id: LinkId,
    ) -> AppResult<QuotaCharge> {
        let mut db_tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin quota charge", e)
        })?;

        let marker = sqlx::query(
            "UPDATE transactions SET download_counted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND download_counted = FALSE",
        )
        .bind(id)
        .execute(&mut *db_tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark transaction counted", e)
        })?;

        if marker.rows_affected() == 0 {
            return Ok(QuotaCharge::AlreadyCounted);
        }

        let quota = sqlx::query(
            "UPDATE payment_links \
             SET current_downloads = current_downloads + 1, updated_at = NOW() \
             WHERE id = $1 AND current_downloads < max_downloads",
        )
        .bind(link_id)
        .execute(&mut *db_tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to claim download quota", e)
        })?;

        if quota.rows_affected() == 0 {
            // Dropping db_tx rolls the marker claim back.
            return Ok(QuotaCharge::Exhausted);
        }

        db_tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit quota charge", e)
        })?;
        Ok(QuotaCharge::Charged)
    }
}
