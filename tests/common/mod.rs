//! Shared test helpers for integration tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use chrono::Utc;
use http::{Request, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tokio::sync::watch;
use tower::ServiceExt;

use paylockr_api::{build_router, build_state};
use paylockr_core::config::AppConfig;
use paylockr_core::error::AppError;
use paylockr_core::result::AppResult;
use paylockr_core::types::{Currency, FileId, LinkId, SellerId};
use paylockr_database::stores::{FileStore, LinkStore, SellerStore, Stores};
use paylockr_entity::{File, PaymentLink, Seller};
use paylockr_gateway::PaymentGateway;
use paylockr_gateway::mock::MockGateway;
use paylockr_rates::cache::RateCache;
use paylockr_rates::fetcher::RateFetcher;

pub const WEBHOOK_HASH: &str = "test-webhook-hash";

/// Fetcher that always fails, pinning the cache to the fallback table
/// (USD 1.0, EUR 0.85, ...). Keeps tests off the network.
#[derive(Debug)]
struct OfflineFetcher;

#[async_trait]
impl RateFetcher for OfflineFetcher {
    async fn fetch_usd_rates(&self) -> AppResult<HashMap<Currency, Decimal>> {
        Err(AppError::service_unavailable("Rate source offline"))
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store set shared with the router
    pub stores: Stores,
    /// Scriptable payment gateway
    pub gateway: Arc<MockGateway>,
    shutdown: watch::Sender<bool>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Create a test application on the in-memory backend with a mock
    /// gateway and zero verification delay.
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.store.backend = "memory".to_string();
        config.gateway.webhook_hash = WEBHOOK_HASH.to_string();
        config.verification.attempt_delay_seconds = 0;

        let stores = Stores::memory();
        let gateway = Arc::new(MockGateway::new());
        let rates = RateCache::new(Arc::new(OfflineFetcher), Duration::from_secs(3600));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let state = build_state(
            config,
            stores.clone(),
            rates,
            gateway.clone() as Arc<dyn PaymentGateway>,
            shutdown_rx,
        );

        Self {
            router: build_router(state),
            stores,
            gateway,
            shutdown,
        }
    }

    /// Broadcast shutdown to in-flight verification polls.
    #[allow(dead_code)]
    pub fn trigger_shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Seed a seller, a 50 USD file, and a payment link selling it.
    pub async fn seed_link(&self, link: PaymentLink) -> PaymentLink {
        let seller = Seller {
            id: link.seller_id,
            email: "seller@example.com".to_string(),
            display_name: Some("Seller".to_string()),
            plan: Default::default(),
            created_at: Utc::now(),
        };
        SellerStore::create(&*self.stores.sellers, &seller)
            .await
            .unwrap();

        let file = File {
            id: link.file_id,
            seller_id: link.seller_id,
            title: "Ambient Pack Vol. 1".to_string(),
            description: Some("128 loops".to_string()),
            price: dec!(50.00),
            file_size: 1_048_576,
            file_type: "application/zip".to_string(),
            storage_path: "files/ambient-pack-1.zip".to_string(),
            created_at: Utc::now(),
        };
        FileStore::create(&*self.stores.files, &file).await.unwrap();

        LinkStore::create(&*self.stores.links, &link).await.unwrap()
    }

    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        self.request_with_headers(method, path, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Deliver a signed Flutterwave webhook for a reference.
    pub async fn deliver_webhook(&self, reference: &str, status: &str) -> TestResponse {
        self.request_with_headers(
            "POST",
            "/api/webhooks/flutterwave",
            Some(serde_json::json!({
                "event": "charge.completed",
                "data": {
                    "id": 1234567,
                    "tx_ref": reference,
                    "status": status,
                }
            })),
            &[("verif-hash", WEBHOOK_HASH)],
        )
        .await
    }

    /// Open a checkout for a link code and return the reference.
    pub async fn open_checkout(&self, code: &str) -> (String, Value) {
        let response = self
            .request(
                "POST",
                &format!("/api/pay/{code}/checkout"),
                Some(serde_json::json!({
                    "customer_email": "buyer@example.com",
                    "customer_name": "Buyer",
                    "currency": "EUR",
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        let reference = response.body["data"]["reference"]
            .as_str()
            .expect("checkout response missing reference")
            .to_string();
        (reference, response.body)
    }
}

/// A valid link selling the seeded file, three downloads allowed.
pub fn sample_link() -> PaymentLink {
    PaymentLink {
        id: LinkId::new(),
        link_code: "abc123".to_string(),
        file_id: FileId::new(),
        seller_id: SellerId::new(),
        custom_price: None,
        custom_message: Some("Thanks for supporting the project!".to_string()),
        expires_at: None,
        max_downloads: 3,
        current_downloads: 0,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
