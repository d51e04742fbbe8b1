//! Buyer-facing settlement verification.
//!
//! Webhooks are the canonical settlement path; this controller only
//! bounds how long a returning buyer waits for the gateway to confirm.
//! It polls the gateway a fixed number of times and lets the ledger's
//! conditional transition arbitrate against concurrent webhook delivery.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use paylockr_core::config::verification::VerificationConfig;
use paylockr_core::error::{AppError, ErrorKind};
use paylockr_core::result::AppResult;
use paylockr_entity::Transaction;
use paylockr_gateway::PaymentGateway;

use crate::ledger::TransactionLedger;

/// Bounds on one verification request.
#[derive(Debug, Clone, Copy)]
pub struct VerifyPolicy {
    /// Gateway polls per request.
    pub max_attempts: u32,
    /// Fixed delay between polls.
    pub delay: Duration,
}

impl VerifyPolicy {
    pub fn from_config(config: &VerificationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: Duration::from_secs(config.attempt_delay_seconds),
        }
    }
}

impl Default for VerifyPolicy {
    fn default() -> Self {
        Self::from_config(&VerificationConfig::default())
    }
}

/// Polls the gateway until a transaction settles or attempts run out.
#[derive(Debug, Clone)]
pub struct VerificationController {
    ledger: TransactionLedger,
    gateway: Arc<dyn PaymentGateway>,
    policy: VerifyPolicy,
    shutdown: watch::Receiver<bool>,
}

impl VerificationController {
    pub fn new(
        ledger: TransactionLedger,
        gateway: Arc<dyn PaymentGateway>,
        policy: VerifyPolicy,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            ledger,
            gateway,
            policy,
            shutdown,
        }
    }

    /// Resolve a reference to a settled transaction, polling the gateway
    /// while it stays pending.
    ///
    /// The poller never marks a transaction failed on its own; running
    /// out of attempts yields `VERIFICATION_TIMEOUT` and leaves the row
    /// pending for the webhook to settle later.
    pub async fn verify(&self, reference: &str) -> AppResult<Transaction> {
        let mut shutdown = self.shutdown.clone();

        for attempt in 1..=self.policy.max_attempts {
            let transaction = self
                .ledger
                .find_by_reference(reference)
                .await?
                .ok_or_else(|| AppError::not_found("Transaction not found"))?;

            if transaction.status.is_terminal() {
                return Ok(transaction);
            }

            match self.gateway.verify(reference).await {
                Ok(verification) => match self.ledger.apply_verification(&verification).await {
                    Ok(Some(settled)) => {
                        info!(reference, attempt, status = ?settled.status, "Verification settled");
                        return Ok(settled);
                    }
                    Ok(None) => {
                        debug!(reference, attempt, "Gateway still reports pending");
                    }
                    Err(err) if err.kind == ErrorKind::InvalidTransition => {
                        // A webhook settled the row between our read and
                        // write; return that terminal state even when this
                        // was the final attempt.
                        let settled = self
                            .ledger
                            .find_by_reference(reference)
                            .await?
                            .ok_or_else(|| AppError::not_found("Transaction not found"))?;
                        if settled.status.is_terminal() {
                            info!(
                                reference,
                                attempt,
                                status = ?settled.status,
                                "Settled concurrently during verification"
                            );
                            return Ok(settled);
                        }
                        continue;
                    }
                    Err(err) => return Err(err),
                },
                Err(err) => {
                    warn!(reference, attempt, error = %err, "Gateway verification attempt failed");
                }
            }

            if attempt < self.policy.max_attempts {
                tokio::select! {
                    _ = tokio::time::sleep(self.policy.delay) => {}
                    stopped = shutdown.wait_for(|stop| *stop) => {
                        if stopped.is_ok() {
                            debug!(reference, "Verification cancelled by shutdown");
                            return Err(AppError::service_unavailable(
                                "Verification interrupted by shutdown",
                            ));
                        }
                    }
                }
            }
        }

        Err(AppError::verification_timeout(
            "Payment is still pending, try again shortly",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use paylockr_database::stores::Stores;
    use paylockr_entity::TransactionStatus;
    use paylockr_gateway::mock::MockGateway;
    use paylockr_gateway::{GatewayVerification, SettlementOutcome};

    use crate::testutil::new_transaction;

    fn controller(
        stores: &Stores,
        gateway: Arc<dyn PaymentGateway>,
        policy: VerifyPolicy,
    ) -> (VerificationController, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        let controller = VerificationController::new(
            TransactionLedger::new(stores.transactions.clone()),
            gateway,
            policy,
            rx,
        );
        (controller, tx)
    }

    fn fast_policy() -> VerifyPolicy {
        VerifyPolicy {
            max_attempts: 5,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_unknown_reference_is_not_found() {
        let stores = Stores::memory();
        let (controller, _cancel) =
            controller(&stores, Arc::new(MockGateway::new()), fast_policy());
        let err = controller.verify("tx_missing").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_terminal_transaction_skips_the_gateway() {
        let stores = Stores::memory();
        let ledger = TransactionLedger::new(stores.transactions.clone());
        ledger.create_pending(&new_transaction("tx_1")).await.unwrap();
        ledger.mark_completed("tx_1", Some("gw-1")).await.unwrap();

        let gateway = Arc::new(MockGateway::new());
        let (controller, _cancel) = controller(&stores, gateway.clone(), fast_policy());

        let settled = controller.verify("tx_1").await.unwrap();
        assert_eq!(settled.status, TransactionStatus::Completed);
        assert_eq!(gateway.verify_call_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_outcome_completes_the_transaction() {
        let stores = Stores::memory();
        TransactionLedger::new(stores.transactions.clone())
            .create_pending(&new_transaction("tx_1"))
            .await
            .unwrap();

        let gateway = Arc::new(MockGateway::new());
        gateway.set_outcome("tx_1", SettlementOutcome::Successful);
        let (controller, _cancel) = controller(&stores, gateway.clone(), fast_policy());

        let settled = controller.verify("tx_1").await.unwrap();
        assert_eq!(settled.status, TransactionStatus::Completed);
        assert_eq!(settled.gateway_tx_id.as_deref(), Some("gw-tx_1"));
        assert_eq!(gateway.verify_call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_outcome_fails_the_transaction() {
        let stores = Stores::memory();
        TransactionLedger::new(stores.transactions.clone())
            .create_pending(&new_transaction("tx_1"))
            .await
            .unwrap();

        let gateway = Arc::new(MockGateway::new());
        gateway.set_outcome("tx_1", SettlementOutcome::Failed);
        let (controller, _cancel) = controller(&stores, gateway, fast_policy());

        let settled = controller.verify("tx_1").await.unwrap();
        assert_eq!(settled.status, TransactionStatus::Failed);
    }

    #[tokio::test]
    async fn test_times_out_after_exactly_max_attempts() {
        let stores = Stores::memory();
        let ledger = TransactionLedger::new(stores.transactions.clone());
        ledger.create_pending(&new_transaction("tx_1")).await.unwrap();

        let gateway = Arc::new(MockGateway::new());
        let (controller, _cancel) = controller(&stores, gateway.clone(), fast_policy());

        let err = controller.verify("tx_1").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::VerificationTimeout);
        assert_eq!(gateway.verify_call_count(), 5);

        // The poller never fails a transaction on its own.
        let stored = ledger.find_by_reference("tx_1").await.unwrap().unwrap();
        assert_eq!(stored.status, TransactionStatus::Pending);
    }

    /// Gateway double whose verify races a webhook settling the same row:
    /// it completes the transaction out of band, then reports a stale
    /// failed verdict.
    #[derive(Debug)]
    struct RacingGateway {
        ledger: TransactionLedger,
    }

    #[async_trait::async_trait]
    impl PaymentGateway for RacingGateway {
        async fn initialize(
            &self,
            _request: &paylockr_gateway::PaymentRequest,
        ) -> AppResult<paylockr_gateway::PaymentSession> {
            unreachable!("verification never opens sessions")
        }

        async fn verify(&self, reference: &str) -> AppResult<GatewayVerification> {
            self.ledger.mark_completed(reference, Some("gw-hook")).await?;
            Ok(GatewayVerification {
                reference: reference.to_string(),
                outcome: SettlementOutcome::Failed,
                gateway_tx_id: None,
                amount: None,
                currency: None,
            })
        }
    }

    #[tokio::test]
    async fn test_concurrent_settlement_on_final_attempt_returns_the_row() {
        let stores = Stores::memory();
        let ledger = TransactionLedger::new(stores.transactions.clone());
        ledger.create_pending(&new_transaction("tx_1")).await.unwrap();

        let gateway = Arc::new(RacingGateway {
            ledger: ledger.clone(),
        });
        let policy = VerifyPolicy {
            max_attempts: 1,
            delay: Duration::ZERO,
        };
        let (controller, _cancel) = controller(&stores, gateway, policy);

        let settled = controller.verify("tx_1").await.unwrap();
        assert_eq!(settled.status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn test_shutdown_stops_waiting() {
        let stores = Stores::memory();
        TransactionLedger::new(stores.transactions.clone())
            .create_pending(&new_transaction("tx_1"))
            .await
            .unwrap();

        let gateway = Arc::new(MockGateway::new());
        let policy = VerifyPolicy {
            max_attempts: 5,
            delay: Duration::from_secs(30),
        };
        let (controller, cancel) = controller(&stores, gateway, policy);

        let handle = tokio::spawn(async move { controller.verify("tx_1").await });
        cancel.send(true).unwrap();

        let err = handle.await.unwrap().unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    }
}
