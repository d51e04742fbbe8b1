//! The payment gateway trait and its wire-level value types.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use paylockr_core::result::AppResult;
use paylockr_core::types::Currency;

/// What the gateway knows about a payment's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementOutcome {
    /// The gateway has not settled the payment yet.
    Pending,
    /// The buyer paid and the gateway confirmed it.
    Successful,
    /// The payment failed or was cancelled.
    Failed,
}

/// Request to open a hosted payment session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Our external reference, the idempotency key shared with the gateway.
    pub reference: String,
    /// Total amount to charge (conversion and fee already applied).
    pub amount: Decimal,
    /// Currency to charge in.
    pub currency: Currency,
    /// Buyer email.
    pub customer_email: String,
    /// Buyer display name.
    pub customer_name: Option<String>,
    /// Human-readable description shown on the gateway's checkout page.
    pub description: Option<String>,
}

/// An opened payment session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Hosted checkout URL the buyer is redirected to.
    pub payment_url: String,
}

/// Result of a verify-by-reference call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayVerification {
    /// The external reference that was verified.
    pub reference: String,
    /// Settlement outcome as the gateway reports it.
    pub outcome: SettlementOutcome,
    /// The gateway's own transaction id, when settled.
    pub gateway_tx_id: Option<String>,
    /// Amount the gateway settled, when available.
    pub amount: Option<Decimal>,
    /// Currency the gateway settled in, when available.
    pub currency: Option<Currency>,
}

/// A hosted payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Open a hosted payment session and return the redirect URL.
    async fn initialize(&self, request: &PaymentRequest) -> AppResult<PaymentSession>;

    /// Ask the gateway for the settlement status of a reference.
    async fn verify(&self, reference: &str) -> AppResult<GatewayVerification>;
}
