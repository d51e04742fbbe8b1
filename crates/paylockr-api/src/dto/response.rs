//! Response DTOs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use paylockr_core::types::Currency;
use paylockr_entity::{File, PaymentLink, Transaction, TransactionStatus};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// File summary shown on the payment page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    /// Display title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// File size in bytes.
    pub file_size: i64,
    /// MIME type.
    pub file_type: String,
}

impl From<&File> for FileSummary {
    fn from(file: &File) -> Self {
        Self {
            title: file.title.clone(),
            description: file.description.clone(),
            file_size: file.file_size,
            file_type: file.file_type.clone(),
        }
    }
}

/// Link lookup response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkLookupResponse {
    /// The link code.
    pub link_code: String,
    /// Effective sale price in the base currency.
    pub price: Decimal,
    /// Currency the price is quoted in.
    pub currency: Currency,
    /// Seller's message for the payment page.
    pub custom_message: Option<String>,
    /// When the link expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Downloads still available.
    pub downloads_remaining: i32,
    /// The file being sold.
    pub file: FileSummary,
}

impl LinkLookupResponse {
    pub fn from_parts(link: &PaymentLink, file: &File) -> Self {
        Self {
            link_code: link.link_code.clone(),
            price: link.effective_price(file.price),
            currency: Currency::Usd,
            custom_message: link.custom_message.clone(),
            expires_at: link.expires_at,
            downloads_remaining: link.max_downloads - link.current_downloads,
            file: FileSummary::from(file),
        }
    }
}

/// Transaction summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// External reference shared with the gateway.
    pub reference: String,
    /// Settlement status.
    pub status: TransactionStatus,
    /// Price before conversion.
    pub base_amount: Decimal,
    /// Currency priced in.
    pub base_currency: Currency,
    /// Amount charged.
    pub charged_amount: Decimal,
    /// Currency charged in.
    pub charged_currency: Currency,
    /// Platform fee.
    pub fee_amount: Decimal,
    /// Exchange rate snapshot.
    pub exchange_rate: Decimal,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.into_uuid(),
            reference: tx.external_reference.clone(),
            status: tx.status,
            base_amount: tx.base_amount,
            base_currency: tx.base_currency,
            charged_amount: tx.charged_amount,
            charged_currency: tx.charged_currency,
            fee_amount: tx.fee_amount,
            exchange_rate: tx.exchange_rate,
            created_at: tx.created_at,
        }
    }
}

/// Checkout response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    /// Hosted checkout URL to redirect the buyer to.
    pub payment_url: String,
    /// Reference to verify with after payment.
    pub reference: String,
    /// The pending transaction.
    pub transaction: TransactionResponse,
}

/// Verification response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Settlement status.
    pub status: TransactionStatus,
    /// Amount charged.
    pub charged_amount: Decimal,
    /// Currency charged in.
    pub charged_currency: Currency,
    /// The settled transaction.
    pub transaction: TransactionResponse,
}

/// Download grant response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResponse {
    /// One-time download URL.
    pub download_url: String,
    /// Name of the purchased file.
    pub file_name: String,
    /// When the URL expires.
    pub expires_at: DateTime<Utc>,
}

/// Grant redemption response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemResponse {
    /// Name of the purchased file.
    pub file_name: String,
    /// MIME type.
    pub file_type: String,
    /// Location in the external storage system.
    pub storage_path: String,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Active store backend.
    pub store_backend: String,
    /// Store connectivity as seen by a probe read.
    pub store_status: String,
}
