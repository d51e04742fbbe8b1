//! Shared domain value types.

pub mod currency;
pub mod id;
pub mod plan;

pub use currency::Currency;
pub use id::{FileId, GrantId, LinkId, SellerId, TransactionId};
pub use plan::PlanTier;
