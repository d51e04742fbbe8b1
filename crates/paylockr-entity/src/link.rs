//! Payment link entity model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use paylockr_core::types::{FileId, LinkId, SellerId};

/// A shareable, constrained token granting purchase access to one file.
///
/// `current_downloads` only ever moves through the store's conditional
/// increment; nothing in the services reads it and writes it back.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentLink {
    /// Unique link identifier.
    pub id: LinkId,
    /// Opaque code embedded in the shared URL.
    pub link_code: String,
    /// The file this link sells.
    pub file_id: FileId,
    /// The seller who owns the link.
    pub seller_id: SellerId,
    /// Price override; falls back to the file's list price when absent.
    pub custom_price: Option<Decimal>,
    /// Optional message shown on the payment page.
    pub custom_message: Option<String>,
    /// When the link stops being redeemable (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum number of downloads the link may grant.
    pub max_downloads: i32,
    /// Downloads granted so far.
    pub current_downloads: i32,
    /// Whether the link is currently active.
    pub is_active: bool,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    /// When the link was last updated.
    pub updated_at: DateTime<Utc>,
}

impl PaymentLink {
    /// Whether the expiry timestamp, if any, has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }

    /// Whether every download the link may grant has been used.
    pub fn is_exhausted(&self) -> bool {
        self.current_downloads >= self.max_downloads
    }

    /// The effective sale price: the custom price when set, else `file_price`.
    pub fn effective_price(&self, file_price: Decimal) -> Decimal {
        self.custom_price.unwrap_or(file_price)
    }
}
