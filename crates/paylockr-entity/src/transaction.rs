//! Transaction entity model and settlement state machine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use paylockr_core::types::{Currency, FileId, LinkId, SellerId, TransactionId};

/// Settlement status of a transaction.
///
/// `Pending` is the only non-terminal state. The ledger enforces the two
/// legal edges (`pending → completed`, `pending → failed`); no transition
/// ever leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Created, awaiting gateway confirmation.
    Pending,
    /// The gateway durably confirmed payment.
    Completed,
    /// The gateway durably reported failure.
    Failed,
}

impl TransactionStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A purchase attempt against a payment link.
///
/// `exchange_rate` is the snapshot captured at creation time; settled
/// amounts stay auditable against it and it is never recomputed from
/// live rates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    /// Unique transaction identifier.
    pub id: TransactionId,
    /// The payment link that was redeemed.
    pub payment_link_id: LinkId,
    /// The purchased file.
    pub file_id: FileId,
    /// The seller receiving the payment.
    pub seller_id: SellerId,
    /// Amount as priced, before conversion.
    pub base_amount: Decimal,
    /// Currency the link was priced in.
    pub base_currency: Currency,
    /// Amount actually charged, after conversion and fee.
    pub charged_amount: Decimal,
    /// Currency the buyer paid in.
    pub charged_currency: Currency,
    /// Exchange rate snapshot at creation time.
    pub exchange_rate: Decimal,
    /// Platform fee included in the charged amount.
    pub fee_amount: Decimal,
    /// Charged amount minus the platform fee.
    pub net_amount: Decimal,
    /// Idempotency key shared with the gateway.
    pub external_reference: String,
    /// The gateway's own transaction id, set on completion.
    pub gateway_tx_id: Option<String>,
    /// Settlement status.
    pub status: TransactionStatus,
    /// Buyer email, checked at grant issuance.
    pub customer_email: String,
    /// Buyer display name.
    pub customer_name: Option<String>,
    /// Whether this transaction has consumed a unit of link quota.
    pub download_counted: bool,
    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
    /// When the transaction was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new pending transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    /// The payment link being redeemed.
    pub payment_link_id: LinkId,
    /// The purchased file.
    pub file_id: FileId,
    /// The seller receiving the payment.
    pub seller_id: SellerId,
    /// Amount as priced.
    pub base_amount: Decimal,
    /// Currency the link was priced in.
    pub base_currency: Currency,
    /// Amount to charge.
    pub charged_amount: Decimal,
    /// Currency the buyer pays in.
    pub charged_currency: Currency,
    /// Exchange rate snapshot.
    pub exchange_rate: Decimal,
    /// Platform fee.
    pub fee_amount: Decimal,
    /// Charged amount minus fee.
    pub net_amount: Decimal,
    /// Idempotency key shared with the gateway.
    pub external_reference: String,
    /// Buyer email.
    pub customer_email: String,
    /// Buyer display name.
    pub customer_name: Option<String>,
}
