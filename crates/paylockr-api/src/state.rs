//! Application state shared across all handlers.

use std::sync::Arc;

use paylockr_core::config::AppConfig;
use paylockr_database::stores::Stores;
use paylockr_service::{
    CheckoutService, GrantIssuer, LinkResolver, TransactionLedger, VerificationController,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Persistence backends.
    pub stores: Stores,
    /// Payment link resolution for the lookup endpoint.
    pub resolver: Arc<LinkResolver>,
    /// Transaction ledger, driven directly by the webhook handler.
    pub ledger: Arc<TransactionLedger>,
    /// Checkout pipeline (resolve, price, record, gateway handoff).
    pub checkout: Arc<CheckoutService>,
    /// Settlement verification poller.
    pub verification: Arc<VerificationController>,
    /// Download grant issuance and redemption.
    pub grants: Arc<GrantIssuer>,
}
