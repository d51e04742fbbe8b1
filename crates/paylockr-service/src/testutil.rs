//! Shared fixtures for the service tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use paylockr_core::types::{Currency, FileId, LinkId, SellerId};
use paylockr_database::stores::{FileStore, LinkStore, SellerStore, Stores};
use paylockr_core::error::AppError;
use paylockr_core::result::AppResult;
use paylockr_entity::{File, NewTransaction, PaymentLink, Seller};
use paylockr_rates::cache::RateCache;
use paylockr_rates::fetcher::RateFetcher;

use crate::resolver::ResolvedLink;

/// Fetcher that always fails, forcing the cache onto the fallback table.
#[derive(Debug)]
pub(crate) struct OfflineFetcher;

#[async_trait]
impl RateFetcher for OfflineFetcher {
    async fn fetch_usd_rates(&self) -> AppResult<HashMap<Currency, Decimal>> {
        Err(AppError::service_unavailable("Rate source offline"))
    }
}

/// A rate cache pinned to the static fallback table.
pub(crate) fn fallback_rates() -> RateCache {
    RateCache::new(Arc::new(OfflineFetcher), Duration::from_secs(3600))
}

/// A valid link selling a 50 USD file, three downloads allowed.
pub(crate) fn sample_link() -> PaymentLink {
    PaymentLink {
        id: LinkId::new(),
        link_code: "abc123".to_string(),
        file_id: FileId::new(),
        seller_id: SellerId::new(),
        custom_price: None,
        custom_message: None,
        expires_at: None,
        max_downloads: 3,
        current_downloads: 0,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Insert the link together with its seller and file rows.
pub(crate) async fn seed(stores: &Stores, link: PaymentLink) -> ResolvedLink {
    let seller = Seller {
        id: link.seller_id,
        email: "seller@example.com".to_string(),
        display_name: Some("Seller".to_string()),
        plan: Default::default(),
        created_at: Utc::now(),
    };
    SellerStore::create(&*stores.sellers, &seller)
        .await
        .unwrap();

    let file = File {
        id: link.file_id,
        seller_id: link.seller_id,
        title: "Ambient Pack Vol. 1".to_string(),
        description: None,
        price: dec!(50.00),
        file_size: 1_048_576,
        file_type: "application/zip".to_string(),
        storage_path: "files/ambient-pack-1.zip".to_string(),
        created_at: Utc::now(),
    };
    FileStore::create(&*stores.files, &file).await.unwrap();

    let link = LinkStore::create(&*stores.links, &link).await.unwrap();
    ResolvedLink { link, file }
}

/// The 50 USD → EUR professional-tier purchase as a pending insert.
pub(crate) fn new_transaction(reference: &str) -> NewTransaction {
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
        customer_name: None,
    }
}
