//! Store traits and backend dispatch.
//!
//! The services only ever see these traits. The PostgreSQL repositories
//! and the in-memory backend both implement them; which one runs is
//! selected from configuration at startup.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use paylockr_core::config::StoreConfig;
use paylockr_core::result::AppResult;
use paylockr_core::types::{FileId, LinkId, SellerId, TransactionId};
use paylockr_core::AppError;
use paylockr_entity::{
    DownloadGrant, File, NewTransaction, PaymentLink, Seller, Transaction, TransactionStatus,
};

/// Payment link persistence.
#[async_trait]
pub trait LinkStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find an active link by its public code. Inactive links are invisible.
    async fn find_active_by_code(&self, code: &str) -> AppResult<Option<PaymentLink>>;

    /// Find a link by id regardless of activation state.
    async fn find_by_id(&self, id: LinkId) -> AppResult<Option<PaymentLink>>;

    /// Create a new link.
    async fn create(&self, link: &PaymentLink) -> AppResult<PaymentLink>;
}

/// Outcome of counting a transaction against its link's download quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaCharge {
    /// This call marked the transaction counted and took one quota unit.
    Charged,
    /// The transaction was counted before; no quota unit was taken.
    AlreadyCounted,
    /// The link has no quota left; the transaction stays uncounted.
    Exhausted,
}

/// Read-only access to protected file rows.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a file by id.
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>>;

    /// Create a file row (seed/admin path; uploads are handled externally).
    async fn create(&self, file: &File) -> AppResult<File>;
}

/// Read-only access to seller accounts.
#[async_trait]
pub trait SellerStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a seller by id.
    async fn find_by_id(&self, id: SellerId) -> AppResult<Option<Seller>>;

    /// Create a seller row.
    async fn create(&self, seller: &Seller) -> AppResult<Seller>;
}

/// Transaction persistence and the settlement state machine's atomic ops.
#[async_trait]
pub trait TransactionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new pending transaction. Fails with `ErrorKind::Duplicate`
    /// when a transaction with the same external reference already exists.
    async fn insert_pending(&self, new: &NewTransaction) -> AppResult<Transaction>;

    /// Find a transaction by id.
    async fn find_by_id(&self, id: TransactionId) -> AppResult<Option<Transaction>>;

    /// Find a transaction by its external reference.
    async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Transaction>>;

    /// Conditionally move a transaction out of `pending` into a terminal
    /// state. Returns the updated row, or `None` when no pending row
    /// matched (already settled or unknown reference).
    async fn transition_from_pending(
        &self,
        reference: &str,
        to: TransactionStatus,
        gateway_tx_id: Option<&str>,
    ) -> AppResult<Option<Transaction>>;

    /// Count a transaction against its link's download quota. The
    /// `download_counted` marker and the `current_downloads` increment
    /// move together in one atomic operation, so a marked transaction
    /// always implies a charged quota unit, and `Exhausted` always
    /// leaves the transaction uncounted for a later retry.
    async fn charge_download_quota(
        &self,
        id: TransactionId,
        link_id: LinkId,
    ) -> AppResult<QuotaCharge>;
}

/// Download grant persistence.
#[async_trait]
pub trait GrantStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a freshly minted grant.
    async fn insert(&self, grant: &DownloadGrant) -> AppResult<DownloadGrant>;

    /// Find a grant by its redemption token.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<DownloadGrant>>;

    /// Mark a grant consumed if it is not already. Returns the grant when
    /// this call consumed it, `None` when it was consumed before.
    async fn consume(&self, token: &str) -> AppResult<Option<DownloadGrant>>;
}

/// The full set of stores the services are wired with.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Payment link store.
    pub links: Arc<dyn LinkStore>,
    /// File store.
    pub files: Arc<dyn FileStore>,
    /// Seller store.
    pub sellers: Arc<dyn SellerStore>,
    /// Transaction store.
    pub transactions: Arc<dyn TransactionStore>,
    /// Download grant store.
    pub grants: Arc<dyn GrantStore>,
}

impl Stores {
    /// Build the store set from configuration.
    ///
    /// `postgres` connects a pool and runs migrations; `memory` builds the
    /// in-process backend.
    pub async fn connect(config: &StoreConfig) -> AppResult<Self> {
        match config.backend.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL store backend");
                let pool = crate::connection::DatabasePool::connect(config).await?;
                crate::migration::run_migrations(pool.pool()).await?;
                Ok(Self::postgres(pool.into_pool()))
            }
            "memory" => {
                info!("Initializing in-memory store backend");
                Ok(Self::memory())
            }
            other => Err(AppError::configuration(format!(
                "Unknown store backend: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// Build the store set on top of an existing PostgreSQL pool.
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            links: Arc::new(crate::repositories::link::LinkRepository::new(pool.clone())),
            files: Arc::new(crate::repositories::file::FileRepository::new(pool.clone())),
            sellers: Arc::new(crate::repositories::seller::SellerRepository::new(
                pool.clone(),
            )),
            transactions: Arc::new(crate::repositories::transaction::TransactionRepository::new(
                pool.clone(),
            )),
            grants: Arc::new(crate::repositories::grant::GrantRepository::new(pool)),
        }
    }

    /// Build the in-memory store set.
    pub fn memory() -> Self {
        let state = crate::memory::MemoryStores::new();
        Self {
            links: Arc::new(state.clone()),
            files: Arc::new(state.clone()),
            sellers: Arc::new(state.clone()),
            transactions: Arc::new(state.clone()),
            grants: Arc::new(state),
        }
    }
}
