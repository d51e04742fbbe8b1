//! Settlement verification configuration.

use serde::{Deserialize, Serialize};

/// Bounded re-verification parameters for the buyer-facing verify flow.
///
/// Webhook delivery is the canonical completion path; these settings only
/// bound how long a returning buyer waits for the gateway to confirm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Maximum number of verification attempts per request.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed delay between attempts, in seconds.
    #[serde(default = "default_delay")]
    pub attempt_delay_seconds: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            attempt_delay_seconds: default_delay(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_delay() -> u64 {
    3
}
