//! Opaque token and reference generation.

use rand::Rng;

/// Generate a 32-byte random token, hex encoded.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.random()).collect();
    hex::encode(bytes)
}

/// Generate a gateway transaction reference: `tx_<millis>_<random>`.
///
/// The reference doubles as the idempotency key shared with the gateway,
/// so it must be unique per checkout but stable once handed out.
pub fn generate_reference() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random();
    format!("tx_{millis}_{suffix:08x}")
}

/// Simple hex encoding without external dependency.
mod hex {
    /// Encode bytes to hex string.
    pub fn encode(bytes: Vec<u8>) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
