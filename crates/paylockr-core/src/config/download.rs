//! Download-grant configuration.

use serde::{Deserialize, Serialize};

/// Settings for minted download grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Public base URL grant download links are built from.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// How long a minted grant stays redeemable, in seconds.
    #[serde(default = "default_grant_ttl")]
    pub grant_ttl_seconds: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            grant_ttl_seconds: default_grant_ttl(),
        }
    }
}

fn default_base_url() -> String {
    "https://app.paylockr.com".to_string()
}

fn default_grant_ttl() -> u64 {
    3600
}
