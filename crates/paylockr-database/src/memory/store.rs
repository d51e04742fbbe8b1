//! In-memory store implementation using a Tokio mutex.
//!
//! Reproduces the atomic guarantees of the PostgreSQL schema (unique
//! external references, conditional quota increments and transitions)
//! under a single lock. Suitable for single-node development and tests
//! only.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use paylockr_core::error::AppError;
use paylockr_core::result::AppResult;
use paylockr_core::types::{FileId, LinkId, SellerId, TransactionId};
use paylockr_entity::{
    DownloadGrant, File, NewTransaction, PaymentLink, Seller, Transaction, TransactionStatus,
};

use crate::stores::{FileStore, GrantStore, LinkStore, QuotaCharge, SellerStore, TransactionStore};

/// Internal state behind the mutex.
#[derive(Debug, Default)]
struct InnerState {
    links: HashMap<LinkId, PaymentLink>,
    files: HashMap<FileId, File>,
    sellers: HashMap<SellerId, Seller>,
    transactions: HashMap<TransactionId, Transaction>,
    /// external_reference -> transaction id, the uniqueness index.
    references: HashMap<String, TransactionId>,
    /// token -> grant.
    grants: HashMap<String, DownloadGrant>,
}

/// In-memory implementation of every store trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStores {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryStores {
    /// Creates an empty store set.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for MemoryStores {
    async fn find_active_by_code(&self, code: &str) -> AppResult<Option<PaymentLink>> {
        let state = self.state.lock().await;
        Ok(state
            .links
            .values()
            .find(|l| l.link_code == code && l.is_active)
            .cloned())
    }

    async fn find_by_id(&self, id: LinkId) -> AppResult<Option<PaymentLink>> {
        let state = self.state.lock().await;
        Ok(state.links.get(&id).cloned())
    }

    async fn create(&self, link: &PaymentLink) -> AppResult<PaymentLink> {
        let mut state = self.state.lock().await;
        if state.links.values().any(|l| l.link_code == link.link_code) {
            return Err(AppError::conflict(format!(
                "Link code already exists: {}",
                link.link_code
            )));
        }
        state.links.insert(link.id, link.clone());
        Ok(link.clone())
    }
}

#[async_trait]
impl FileStore for MemoryStores {
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        let state = self.state.lock().await;
        Ok(state.files.get(&id).cloned())
    }

    async fn create(&self, file: &File) -> AppResult<File> {
        let mut state = self.state.lock().await;
        state.files.insert(file.id, file.clone());
        Ok(file.clone())
    }
}

#[async_trait]
impl SellerStore for MemoryStores {
    async fn find_by_id(&self, id: SellerId) -> AppResult<Option<Seller>> {
        let state = self.state.lock().await;
        Ok(state.sellers.get(&id).cloned())
    }

    async fn create(&self, seller: &Seller) -> AppResult<Seller> {
        let mut state = self.state.lock().await;
        state.sellers.insert(seller.id, seller.clone());
        Ok(seller.clone())
    }
}

#[async_trait]
impl TransactionStore for MemoryStores {
    async fn insert_pending(&self, new: &NewTransaction) -> AppResult<Transaction> {
        let mut state = self.state.lock().await;
        if state.references.contains_key(&new.external_reference) {
            return Err(AppError::duplicate(format!(
                "Transaction already exists for reference {}",
                new.external_reference
            )));
        }

        let now = Utc::now();
        let tx = Transaction {
            id: TransactionId::new(),
            payment_link_id: new.payment_link_id,
            file_id: new.file_id,
            seller_id: new.seller_id,
            base_amount: new.base_amount,
            base_currency: new.base_currency,
            charged_amount: new.charged_amount,
            charged_currency: new.charged_currency,
            exchange_rate: new.exchange_rate,
            fee_amount: new.fee_amount,
            net_amount: new.net_amount,
            external_reference: new.external_reference.clone(),
            gateway_tx_id: None,
            status: TransactionStatus::Pending,
            customer_email: new.customer_email.clone(),
            customer_name: new.customer_name.clone(),
            download_counted: false,
            created_at: now,
            updated_at: now,
        };

        state.references.insert(tx.external_reference.clone(), tx.id);
        state.transactions.insert(tx.id, tx.clone());
        Ok(tx)
    }

    async fn find_by_id(&self, id: TransactionId) -> AppResult<Option<Transaction>> {
        let state = self.state.lock().await;
        Ok(state.transactions.get(&id).cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Transaction>> {
        let state = self.state.lock().await;
        Ok(state
            .references
            .get(reference)
            .and_then(|id| state.transactions.get(id))
            .cloned())
    }

    async fn transition_from_pending(
        &self,
        reference: &str,
        to: TransactionStatus,
        gateway_tx_id: Option<&str>,
    ) -> AppResult<Option<Transaction>> {
        let mut state = self.state.lock().await;
        let Some(id) = state.references.get(reference).copied() else {
            return Ok(None);
        };
        let Some(tx) = state.transactions.get_mut(&id) else {
            return Ok(None);
        };
        if tx.status != TransactionStatus::Pending {
            return Ok(None);
        }

        tx.status = to;
        if let Some(gw_id) = gateway_tx_id {
            tx.gateway_tx_id = Some(gw_id.to_string());
        }
        tx.updated_at = Utc::now();
        Ok(Some(tx.clone()))
    }

    // Marker and quota move together under the one lock, mirroring the
    // SQL transaction in the PostgreSQL repository.
    async fn charge_download_quota(
        &self,
        id: TransactionId,
        link_id: LinkId,
    ) -> AppResult<QuotaCharge> {
        let mut state = self.state.lock().await;
        match state.transactions.get(&id) {
            Some(tx) if !tx.download_counted => {}
            _ => return Ok(QuotaCharge::AlreadyCounted),
        }

        let now = Utc::now();
        let Some(link) = state.links.get_mut(&link_id) else {
            return Ok(QuotaCharge::Exhausted);
        };
        if link.current_downloads >= link.max_downloads {
            return Ok(QuotaCharge::Exhausted);
        }
        link.current_downloads += 1;
        link.updated_at = now;

        if let Some(tx) = state.transactions.get_mut(&id) {
            tx.download_counted = true;
            tx.updated_at = now;
        }
        Ok(QuotaCharge::Charged)
    }
}

#[async_trait]
impl GrantStore for MemoryStores {
    async fn insert(&self, grant: &DownloadGrant) -> AppResult<DownloadGrant> {
        let mut state = self.state.lock().await;
        state.grants.insert(grant.token.clone(), grant.clone());
        Ok(grant.clone())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<DownloadGrant>> {
        let state = self.state.lock().await;
        Ok(state.grants.get(token).cloned())
    }

    async fn consume(&self, token: &str) -> AppResult<Option<DownloadGrant>> {
        let mut state = self.state.lock().await;
        let Some(grant) = state.grants.get_mut(token) else {
            return Ok(None);
        };
        if grant.consumed {
            return Ok(None);
        }
        grant.consumed = true;
        Ok(Some(grant.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paylockr_core::error::ErrorKind;
    use paylockr_core::types::Currency;
    use rust_decimal_macros::dec;

    fn sample_link(max_downloads: i32) -> PaymentLink {
        let now = Utc::now();
        PaymentLink {
            id: LinkId::new(),
            link_code: format!("code-{}", LinkId::new()),
            file_id: FileId::new(),
            seller_id: SellerId::new(),
            custom_price: None,
            custom_message: None,
            expires_at: None,
            max_downloads,
            current_downloads: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_new_tx(reference: &str) -> NewTransaction {
        NewTransaction {
            payment_link_id: LinkId::new(),
            file_id: FileId::new(),
            seller_id: SellerId::new(),
            base_amount: dec!(50.00),
            base_currency: Currency::Usd,
            charged_amount: dec!(43.78),
            charged_currency: Currency::Eur,
            exchange_rate: dec!(0.85),
            fee_amount: dec!(1.28),
            net_amount: dec!(42.50),
            external_reference: reference.to_string(),
            customer_email: "buyer@example.com".to_string(),
            customer_name: Some("Buyer".to_string()),
        }
    }

    #[tokio::test]
    async fn test_duplicate_reference_rejected() {
        let stores = MemoryStores::new();
        stores.insert_pending(&sample_new_tx("tx_1")).await.unwrap();
        let err = stores
            .insert_pending(&sample_new_tx("tx_1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Duplicate);
    }

    #[tokio::test]
    async fn test_transition_only_leaves_pending_once() {
        let stores = MemoryStores::new();
        stores.insert_pending(&sample_new_tx("tx_2")).await.unwrap();

        let first = stores
            .transition_from_pending("tx_2", TransactionStatus::Completed, Some("flw-9"))
            .await
            .unwrap();
        assert_eq!(first.unwrap().status, TransactionStatus::Completed);

        let second = stores
            .transition_from_pending("tx_2", TransactionStatus::Failed, None)
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_quota_charges_never_oversell() {
        let stores = MemoryStores::new();
        let link = sample_link(1);
        LinkStore::create(&stores, &link).await.unwrap();

        let mut transactions = Vec::new();
        for i in 0..8 {
            let tx = stores
                .insert_pending(&sample_new_tx(&format!("tx_c{i}")))
                .await
                .unwrap();
            transactions.push(tx);
        }

        let charges = futures::future::join_all(
            transactions
                .iter()
                .map(|tx| stores.charge_download_quota(tx.id, link.id)),
        )
        .await;

        let charged = charges
            .iter()
            .filter(|r| *r.as_ref().unwrap() == QuotaCharge::Charged)
            .count();
        assert_eq!(charged, 1);

        let stored = LinkStore::find_by_id(&stores, link.id).await.unwrap().unwrap();
        assert_eq!(stored.current_downloads, 1);
    }

    #[tokio::test]
    async fn test_quota_charged_once_per_transaction() {
        let stores = MemoryStores::new();
        let link = sample_link(2);
        LinkStore::create(&stores, &link).await.unwrap();
        let tx = stores.insert_pending(&sample_new_tx("tx_3")).await.unwrap();

        assert_eq!(
            stores.charge_download_quota(tx.id, link.id).await.unwrap(),
            QuotaCharge::Charged
        );
        assert_eq!(
            stores.charge_download_quota(tx.id, link.id).await.unwrap(),
            QuotaCharge::AlreadyCounted
        );

        let stored = LinkStore::find_by_id(&stores, link.id).await.unwrap().unwrap();
        assert_eq!(stored.current_downloads, 1);
    }

    #[tokio::test]
    async fn test_exhausted_charge_leaves_transaction_uncounted() {
        let stores = MemoryStores::new();
        let link = sample_link(1);
        LinkStore::create(&stores, &link).await.unwrap();
        let first = stores.insert_pending(&sample_new_tx("tx_4")).await.unwrap();
        let second = stores.insert_pending(&sample_new_tx("tx_5")).await.unwrap();

        assert_eq!(
            stores.charge_download_quota(first.id, link.id).await.unwrap(),
            QuotaCharge::Charged
        );
        assert_eq!(
            stores.charge_download_quota(second.id, link.id).await.unwrap(),
            QuotaCharge::Exhausted
        );

        let stored = TransactionStore::find_by_id(&stores, second.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.download_counted);
    }

    #[tokio::test]
    async fn test_grant_consumed_once() {
        let stores = MemoryStores::new();
        let now = Utc::now();
        let grant = DownloadGrant {
            id: paylockr_core::types::GrantId::new(),
            transaction_id: TransactionId::new(),
            token: "tok".to_string(),
            url: "https://example.com/tok".to_string(),
            issued_at: now,
            expires_at: now + chrono::Duration::hours(1),
            consumed: false,
        };
        GrantStore::insert(&stores, &grant).await.unwrap();

        assert!(stores.consume("tok").await.unwrap().is_some());
        assert!(stores.consume("tok").await.unwrap().is_none());
    }
}
