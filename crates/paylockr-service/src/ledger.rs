//! The transaction ledger and its settlement state machine.

use std::sync::Arc;

use tracing::{info, warn};

use paylockr_core::error::{AppError, ErrorKind};
use paylockr_core::result::AppResult;
use paylockr_database::stores::TransactionStore;
use paylockr_entity::{NewTransaction, Transaction, TransactionStatus};
use paylockr_gateway::{GatewayVerification, SettlementOutcome};

/// Owns transaction rows and the only two legal state transitions.
///
/// Everything here leans on the store's atomic primitives: the unique
/// index on `external_reference` for create idempotency and the
/// conditional `status = 'pending'` update for settlement. The ledger
/// itself never read-modify-writes a status.
#[derive(Debug, Clone)]
pub struct TransactionLedger {
    transactions: Arc<dyn TransactionStore>,
}

impl TransactionLedger {
    pub fn new(transactions: Arc<dyn TransactionStore>) -> Self {
        Self { transactions }
    }

    /// Create a pending transaction, or return the one already holding
    /// this reference. A duplicate insert is success-equivalent.
    pub async fn create_pending(&self, new: &NewTransaction) -> AppResult<Transaction> {
        match self.transactions.insert_pending(new).await {
            Ok(transaction) => Ok(transaction),
            Err(err) if err.kind == ErrorKind::Duplicate => {
                info!(
                    reference = %new.external_reference,
                    "Reference already recorded, returning existing transaction"
                );
                self.transactions
                    .find_by_reference(&new.external_reference)
                    .await?
                    .ok_or(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Look up a transaction by reference.
    pub async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Transaction>> {
        self.transactions.find_by_reference(reference).await
    }

    /// Move a pending transaction to `completed`.
    pub async fn mark_completed(
        &self,
        reference: &str,
        gateway_tx_id: Option<&str>,
    ) -> AppResult<Transaction> {
        self.settle(reference, TransactionStatus::Completed, gateway_tx_id)
            .await
    }

    /// Move a pending transaction to `failed`.
    pub async fn mark_failed(&self, reference: &str) -> AppResult<Transaction> {
        self.settle(reference, TransactionStatus::Failed, None).await
    }

    /// Fold a gateway verification into the ledger. Pending outcomes
    /// write nothing; settled outcomes drive the conditional transition.
    pub async fn apply_verification(
        &self,
        verification: &GatewayVerification,
    ) -> AppResult<Option<Transaction>> {
        match verification.outcome {
            SettlementOutcome::Pending => Ok(None),
            SettlementOutcome::Successful => self
                .mark_completed(
                    &verification.reference,
                    verification.gateway_tx_id.as_deref(),
                )
                .await
                .map(Some),
            SettlementOutcome::Failed => {
                self.mark_failed(&verification.reference).await.map(Some)
            }
        }
    }

    async fn settle(
        &self,
        reference: &str,
        to: TransactionStatus,
        gateway_tx_id: Option<&str>,
    ) -> AppResult<Transaction> {
        if let Some(updated) = self
            .transactions
            .transition_from_pending(reference, to, gateway_tx_id)
            .await?
        {
            info!(reference, status = ?to, "Transaction settled");
            return Ok(updated);
        }

        // No pending row matched. Decide between replayed delivery,
        // conflicting terminal state, and unknown reference.
        let existing = self
            .transactions
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| AppError::not_found("Transaction not found"))?;

        if existing.status == to {
            return Ok(existing);
        }

        warn!(
            reference,
            current = ?existing.status,
            requested = ?to,
            "Refused settlement transition out of a terminal state"
        );
        Err(AppError::invalid_transition(format!(
            "Transaction is already {:?}",
            existing.status
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paylockr_database::stores::Stores;

    use crate::testutil::new_transaction;

    fn ledger(stores: &Stores) -> TransactionLedger {
        TransactionLedger::new(stores.transactions.clone())
    }

    #[tokio::test]
    async fn test_duplicate_create_returns_existing() {
        let stores = Stores::memory();
        let ledger = ledger(&stores);

        let first = ledger.create_pending(&new_transaction("tx_1")).await.unwrap();
        let second = ledger.create_pending(&new_transaction("tx_1")).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_complete_then_replay_is_noop() {
        let stores = Stores::memory();
        let ledger = ledger(&stores);
        ledger.create_pending(&new_transaction("tx_1")).await.unwrap();

        let completed = ledger.mark_completed("tx_1", Some("gw-9")).await.unwrap();
        assert_eq!(completed.status, TransactionStatus::Completed);
        assert_eq!(completed.gateway_tx_id.as_deref(), Some("gw-9"));

        let replayed = ledger.mark_completed("tx_1", Some("gw-9")).await.unwrap();
        assert_eq!(replayed.id, completed.id);
        assert_eq!(replayed.status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn test_conflicting_terminal_states_are_refused() {
        let stores = Stores::memory();
        let ledger = ledger(&stores);
        ledger.create_pending(&new_transaction("tx_1")).await.unwrap();
        ledger.mark_failed("tx_1").await.unwrap();

        let err = ledger.mark_completed("tx_1", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTransition);
    }

    #[tokio::test]
    async fn test_unknown_reference_is_not_found() {
        let stores = Stores::memory();
        let err = ledger(&stores).mark_failed("tx_missing").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_pending_verification_writes_nothing() {
        let stores = Stores::memory();
        let ledger = ledger(&stores);
        ledger.create_pending(&new_transaction("tx_1")).await.unwrap();

        let applied = ledger
            .apply_verification(&GatewayVerification {
                reference: "tx_1".to_string(),
                outcome: SettlementOutcome::Pending,
                gateway_tx_id: None,
                amount: None,
                currency: None,
            })
            .await
            .unwrap();
        assert!(applied.is_none());

        let stored = ledger.find_by_reference("tx_1").await.unwrap().unwrap();
        assert_eq!(stored.status, TransactionStatus::Pending);
    }
}
