//! Exchange-rate source configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the live exchange-rate source and the rate cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    /// URL returning USD-based rates as `{"rates": {"EUR": 0.85, ...}}`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// How long a fetched rate table stays fresh, in seconds.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// HTTP request timeout for rate fetches, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            ttl_seconds: default_ttl(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.exchangerate-api.com/v4/latest/USD".to_string()
}

fn default_ttl() -> u64 {
    3600
}

fn default_request_timeout() -> u64 {
    10
}
