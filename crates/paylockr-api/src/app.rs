//! Wires stores, the rate cache, and the gateway into [`AppState`].

use std::sync::Arc;

use tokio::sync::watch;

use paylockr_core::config::AppConfig;
use paylockr_database::stores::Stores;
use paylockr_gateway::PaymentGateway;
use paylockr_rates::cache::RateCache;
use paylockr_rates::pricing::PricingEngine;
use paylockr_service::{
    CheckoutService, GrantIssuer, LinkResolver, TransactionLedger, VerificationController,
    VerifyPolicy,
};

use crate::state::AppState;

/// Assemble the full service graph.
///
/// The stores, rate cache, and gateway come in as already-built pieces
/// so the same wiring serves production (PostgreSQL, HTTP fetcher,
/// Flutterwave) and tests (memory stores, offline cache, mock gateway).
pub fn build_state(
    config: AppConfig,
    stores: Stores,
    rates: RateCache,
    gateway: Arc<dyn PaymentGateway>,
    shutdown: watch::Receiver<bool>,
) -> AppState {
    let resolver = LinkResolver::new(stores.links.clone(), stores.files.clone());
    let ledger = TransactionLedger::new(stores.transactions.clone());

    let checkout = CheckoutService::new(
        resolver.clone(),
        ledger.clone(),
        stores.sellers.clone(),
        PricingEngine::new(rates),
        gateway.clone(),
    );

    let verification = VerificationController::new(
        ledger.clone(),
        gateway,
        VerifyPolicy::from_config(&config.verification),
        shutdown,
    );

    let grants = GrantIssuer::new(
        stores.transactions.clone(),
        stores.files.clone(),
        stores.grants.clone(),
        config.download.clone(),
    );

    AppState {
        config: Arc::new(config),
        stores,
        resolver: Arc::new(resolver),
        ledger: Arc::new(ledger),
        checkout: Arc::new(checkout),
        verification: Arc::new(verification),
        grants: Arc::new(grants),
    }
}
