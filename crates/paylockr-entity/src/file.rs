//! Protected file entity model.
//!
//! Upload and storage handling live outside this system; files appear
//! here as read-only rows the redemption pipeline references.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use paylockr_core::types::{FileId, SellerId};

/// A digital file a seller has put behind payment links.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The seller who owns the file.
    pub seller_id: SellerId,
    /// Display title.
    pub title: String,
    /// Optional description shown on the payment page.
    pub description: Option<String>,
    /// List price in USD.
    pub price: Decimal,
    /// File size in bytes.
    pub file_size: i64,
    /// MIME type.
    pub file_type: String,
    /// Location in the external storage system.
    pub storage_path: String,
    /// When the file row was created.
    pub created_at: DateTime<Utc>,
}
