//! # paylockr-rates
//!
//! Currency conversion for the redemption pipeline: a TTL-bounded cache
//! of USD-relative exchange rates with graceful degradation, and the
//! pricing engine that turns a link's base price into the amount the
//! gateway charges.

pub mod cache;
pub mod fallback;
pub mod fetcher;
pub mod pricing;

pub use cache::RateCache;
pub use fetcher::{HttpRateFetcher, RateFetcher};
pub use pricing::{PricingEngine, Quote};
