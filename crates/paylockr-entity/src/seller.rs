//! Seller account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use paylockr_core::types::{PlanTier, SellerId};

/// A seller account, carrying the subscription tier that determines the
/// platform fee on each sale.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Seller {
    /// Unique seller identifier.
    pub id: SellerId,
    /// Contact email.
    pub email: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Subscription tier.
    pub plan: PlanTier,
    /// When the seller account was created.
    pub created_at: DateTime<Utc>,
}
