//! Download grant issuance and redemption.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use paylockr_core::config::download::DownloadConfig;
use paylockr_core::error::AppError;
use paylockr_core::result::AppResult;
use paylockr_core::types::{GrantId, TransactionId};
use paylockr_database::stores::{FileStore, GrantStore, QuotaCharge, TransactionStore};
use paylockr_entity::{DownloadGrant, File, Transaction, TransactionStatus};

use crate::token;

/// Mints and redeems download grants for completed transactions.
///
/// Link quota is charged once per transaction, not per grant: the first
/// issuance counts the transaction against the link quota in a single
/// atomic store operation. Re-issuing for an already-counted
/// transaction mints a fresh grant for free.
#[derive(Debug, Clone)]
pub struct GrantIssuer {
    transactions: Arc<dyn TransactionStore>,
    files: Arc<dyn FileStore>,
    grants: Arc<dyn GrantStore>,
    config: DownloadConfig,
}

impl GrantIssuer {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        files: Arc<dyn FileStore>,
        grants: Arc<dyn GrantStore>,
        config: DownloadConfig,
    ) -> Self {
        Self {
            transactions,
            files,
            grants,
            config,
        }
    }

    /// Issue a download grant for a completed transaction.
    pub async fn issue(
        &self,
        transaction_id: TransactionId,
        customer_email: &str,
    ) -> AppResult<DownloadGrant> {
        let transaction = self
            .transactions
            .find_by_id(transaction_id)
            .await?
            .ok_or_else(|| AppError::not_found("Transaction not found"))?;

        if transaction.status != TransactionStatus::Completed {
            return Err(AppError::not_completed("Payment has not been completed"));
        }

        if !transaction
            .customer_email
            .eq_ignore_ascii_case(customer_email)
        {
            return Err(AppError::unauthorized(
                "Email does not match this purchase",
            ));
        }

        if !transaction.download_counted {
            self.charge_link_quota(&transaction).await?;
        }

        let grant = self.mint(transaction_id).await?;
        info!(
            transaction_id = %transaction_id,
            expires_at = %grant.expires_at,
            "Download grant issued"
        );
        Ok(grant)
    }

    /// Redeem a grant token, consuming it and returning the file to serve.
    pub async fn redeem(&self, grant_token: &str) -> AppResult<(File, DownloadGrant)> {
        let grant = self
            .grants
            .find_by_token(grant_token)
            .await?
            .ok_or_else(|| AppError::not_found("Download link not found"))?;

        if grant.is_expired(Utc::now()) {
            return Err(AppError::link_expired("This download link has expired"));
        }

        let grant = self
            .grants
            .consume(grant_token)
            .await?
            .ok_or_else(|| AppError::conflict("This download link was already used"))?;

        let transaction = self
            .transactions
            .find_by_id(grant.transaction_id)
            .await?
            .ok_or_else(|| AppError::not_found("Transaction not found"))?;

        let file = self
            .files
            .find_by_id(transaction.file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        Ok((file, grant))
    }

    /// First issuance for a transaction: count it against the link quota.
    /// The store moves the marker and the increment together, so a counted
    /// transaction always holds a quota unit and an exhausted link leaves
    /// the transaction uncounted for a support-driven retry.
    async fn charge_link_quota(&self, transaction: &Transaction) -> AppResult<()> {
        match self
            .transactions
            .charge_download_quota(transaction.id, transaction.payment_link_id)
            .await?
        {
            QuotaCharge::Charged | QuotaCharge::AlreadyCounted => Ok(()),
            QuotaCharge::Exhausted => {
                warn!(
                    transaction_id = %transaction.id,
                    link_id = %transaction.payment_link_id,
                    "Paid transaction exceeds link download quota"
                );
                Err(AppError::quota_exceeded(
                    "This link's download limit has been reached, contact support",
                ))
            }
        }
    }

    async fn mint(&self, transaction_id: TransactionId) -> AppResult<DownloadGrant> {
        let grant_token = token::generate_token();
        let now = Utc::now();
        let ttl = Duration::from_secs(self.config.grant_ttl_seconds);

        self.grants
            .insert(&DownloadGrant {
                id: GrantId::new(),
                transaction_id,
                url: format!(
                    "{}/api/downloads/{}",
                    self.config.base_url.trim_end_matches('/'),
                    grant_token
                ),
                token: grant_token,
                issued_at: now,
                expires_at: now + ttl,
                consumed: false,
            })
            .await
    }
}
