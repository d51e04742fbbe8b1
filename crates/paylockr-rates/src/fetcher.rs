//! Live exchange-rate fetching.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use paylockr_core::config::rates::RatesConfig;
use paylockr_core::error::{AppError, ErrorKind};
use paylockr_core::result::AppResult;
use paylockr_core::types::Currency;

/// Source of USD-relative exchange rates.
///
/// The cache owns retry/fallback policy; a fetcher only reports success
/// or failure for a single attempt.
#[async_trait]
pub trait RateFetcher: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch a fresh USD-based rate table.
    async fn fetch_usd_rates(&self) -> AppResult<HashMap<Currency, Decimal>>;
}

/// Response shape of the public exchange-rate API.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, Decimal>,
}

/// Fetches rates from a public HTTP endpoint returning
/// `{"rates": {"EUR": 0.85, ...}}` relative to USD.
#[derive(Debug, Clone)]
pub struct HttpRateFetcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRateFetcher {
    /// Create a fetcher from configuration.
    pub fn new(config: &RatesConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl RateFetcher for HttpRateFetcher {
    async fn fetch_usd_rates(&self) -> AppResult<HashMap<Currency, Decimal>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ServiceUnavailable, "Rate fetch failed", e)
            })?;

        if !response.status().is_success() {
            return Err(AppError::service_unavailable(format!(
                "Rate source returned HTTP {}",
                response.status()
            )));
        }

        let body: RatesResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Invalid rate response", e)
        })?;

        // Keep only the currencies we can actually charge in; the source
        // reports far more. USD is pinned to 1 regardless of the payload.
        let mut rates: HashMap<Currency, Decimal> = body
            .rates
            .iter()
            .filter_map(|(code, rate)| Currency::from_str(code).ok().map(|c| (c, *rate)))
            .collect();
        rates.insert(Currency::Usd, Decimal::ONE);

        debug!(count = rates.len(), "Fetched live exchange rates");
        Ok(rates)
    }
}
