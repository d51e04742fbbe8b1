//! Flutterwave webhook payload parsing and signature verification.
//!
//! Flutterwave signs deliveries by echoing the merchant-configured hash
//! in the `verif-hash` header. Deliveries without a matching hash are
//! rejected before the body is looked at.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use paylockr_core::error::AppError;
use paylockr_core::result::AppResult;
use paylockr_core::types::Currency;

use crate::adapter::{GatewayVerification, SettlementOutcome};

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "verif-hash";

/// A parsed webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Event name, e.g. `charge.completed`.
    pub event: String,
    pub data: WebhookData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookData {
    pub id: Option<i64>,
    pub tx_ref: String,
    pub status: String,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
}

impl WebhookEvent {
    /// Parse a delivery body. Unknown fields are ignored.
    pub fn parse(body: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(body)
            .map_err(|e| AppError::validation(format!("Malformed webhook payload: {e}")))
    }

    /// Fold the delivery into the same shape a verify call produces.
    pub fn into_verification(self) -> GatewayVerification {
        let outcome = match self.data.status.as_str() {
            "successful" => SettlementOutcome::Successful,
            "failed" | "cancelled" => SettlementOutcome::Failed,
            _ => SettlementOutcome::Pending,
        };
        GatewayVerification {
            reference: self.data.tx_ref,
            outcome,
            gateway_tx_id: self.data.id.map(|id| id.to_string()),
            amount: self.data.amount,
            currency: self
                .data
                .currency
                .as_deref()
                .and_then(|c| Currency::from_str(c).ok()),
        }
    }
}

/// Check the `verif-hash` header against the configured hash.
pub fn verify_signature(header: Option<&str>, expected: &str) -> AppResult<()> {
    if expected.is_empty() {
        return Err(AppError::configuration("Webhook hash is not configured"));
    }
    match header {
        Some(provided) if provided == expected => Ok(()),
        _ => Err(AppError::unauthorized("Invalid webhook signature")),
    }
}
