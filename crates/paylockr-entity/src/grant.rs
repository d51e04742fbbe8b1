//! Download grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use paylockr_core::types::{GrantId, TransactionId};

/// A short-lived credential authorizing one download of a purchased file.
///
/// Grants are minted lazily for completed transactions; re-issuing for the
/// same transaction creates a fresh row without touching link quota.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DownloadGrant {
    /// Unique grant identifier.
    pub id: GrantId,
    /// The transaction this grant fulfils.
    pub transaction_id: TransactionId,
    /// Opaque redemption token embedded in the URL.
    pub token: String,
    /// Full download URL handed to the buyer.
    pub url: String,
    /// When the grant was minted.
    pub issued_at: DateTime<Utc>,
    /// When the grant stops being redeemable.
    pub expires_at: DateTime<Utc>,
    /// Whether the grant has been redeemed.
    pub consumed: bool,
}

impl DownloadGrant {
    /// Whether the grant's TTL has elapsed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
