//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use paylockr_core::types::Currency;

/// Checkout request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutRequest {
    /// Buyer email; the download later requires the same address.
    #[validate(email(message = "A valid email address is required"))]
    pub customer_email: String,
    /// Buyer display name.
    pub customer_name: Option<String>,
    /// Currency to pay in.
    pub currency: Currency,
}

/// Download grant request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DownloadRequest {
    /// The completed transaction being redeemed.
    pub transaction_id: Uuid,
    /// Buyer email, matched against the purchase.
    #[validate(email(message = "A valid email address is required"))]
    pub customer_email: String,
}
