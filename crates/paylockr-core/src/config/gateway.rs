//! Payment gateway configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the hosted payment gateway (Flutterwave).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Secret API key used as a bearer token.
    #[serde(default)]
    pub secret_key: String,
    /// Shared secret the gateway echoes in the `verif-hash` webhook header.
    #[serde(default)]
    pub webhook_hash: String,
    /// URL the gateway redirects the buyer to after payment.
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
    /// HTTP request timeout for gateway calls, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            secret_key: String::new(),
            webhook_hash: String::new(),
            redirect_url: default_redirect_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.flutterwave.com/v3".to_string()
}

fn default_redirect_url() -> String {
    "https://app.paylockr.com/payment/success".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
