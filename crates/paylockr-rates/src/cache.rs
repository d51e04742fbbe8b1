//! TTL-bounded exchange-rate cache with graceful degradation.
//!
//! One instance is constructed at startup and shared by reference; there
//! is no process-global state. The snapshot (rate table + fetch instant)
//! is read and replaced as a single unit, so racing refreshes settle to
//! last-writer-wins, which is acceptable while rates are advisory within
//! the TTL window.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::warn;

use paylockr_core::config::rates::RatesConfig;
use paylockr_core::types::Currency;

use crate::fallback::fallback_rate;
use crate::fetcher::RateFetcher;

/// A fetched rate table and when it was fetched.
#[derive(Debug, Clone)]
struct RateSnapshot {
    rates: HashMap<Currency, Decimal>,
    fetched_at: Instant,
}

/// Cached USD-relative exchange rates with an injected TTL and fetcher.
///
/// `rate()` never fails: a fetch failure degrades to the stale snapshot
/// when one exists, else to the static fallback table.
#[derive(Debug, Clone)]
pub struct RateCache {
    fetcher: Arc<dyn RateFetcher>,
    ttl: Duration,
    snapshot: Arc<RwLock<Option<RateSnapshot>>>,
}

impl RateCache {
    /// Create a cache with the given fetcher and TTL.
    pub fn new(fetcher: Arc<dyn RateFetcher>, ttl: Duration) -> Self {
        Self {
            fetcher,
            ttl,
            snapshot: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a cache from configuration.
    pub fn from_config(fetcher: Arc<dyn RateFetcher>, config: &RatesConfig) -> Self {
        Self::new(fetcher, Duration::from_secs(config.ttl_seconds))
    }

    /// The cross rate from one currency to another.
    ///
    /// Same-currency pairs short-circuit to 1 without touching the cache.
    pub async fn rate(&self, from: Currency, to: Currency) -> Decimal {
        if from == to {
            return Decimal::ONE;
        }

        let rates = self.current_rates().await;
        let from_rate = rates
            .get(&from)
            .copied()
            .unwrap_or_else(|| fallback_rate(from));
        let to_rate = rates.get(&to).copied().unwrap_or_else(|| fallback_rate(to));

        to_rate / from_rate
    }

    /// The freshest rate table available: cached-if-fresh, else a new
    /// fetch, else stale cache, else the static fallback.
    async fn current_rates(&self) -> HashMap<Currency, Decimal> {
        {
            let guard = self.snapshot.read().await;
            if let Some(snapshot) = guard.as_ref() {
                if snapshot.fetched_at.elapsed() < self.ttl {
                    return snapshot.rates.clone();
                }
            }
        }

        match self.fetcher.fetch_usd_rates().await {
            Ok(rates) => {
                let mut guard = self.snapshot.write().await;
                *guard = Some(RateSnapshot {
                    rates: rates.clone(),
                    fetched_at: Instant::now(),
                });
                rates
            }
            Err(e) => {
                let guard = self.snapshot.read().await;
                match guard.as_ref() {
                    Some(snapshot) => {
                        warn!(error = %e, "Rate fetch failed, serving expired cached rates");
                        snapshot.rates.clone()
                    }
                    None => {
                        warn!(error = %e, "Rate fetch failed, using static fallback rates");
                        Currency::ALL
                            .iter()
                            .map(|&c| (c, fallback_rate(c)))
                            .collect()
                    }
                }
            }
        }
    }
}
