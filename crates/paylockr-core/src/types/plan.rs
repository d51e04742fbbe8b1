//! Seller subscription plan tiers.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The seller's subscription level, determining the platform fee rate
/// applied to each sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "plan_tier", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    /// Entry tier, 5% platform fee.
    Starter,
    /// Mid tier, 3% platform fee.
    Professional,
    /// Top tier, 1% platform fee.
    Enterprise,
}

impl PlanTier {
    /// The platform fee rate for this tier, as a fraction.
    pub fn fee_rate(&self) -> Decimal {
        match self {
            // 0.05 / 0.03 / 0.01
            Self::Starter => Decimal::new(5, 2),
            Self::Professional => Decimal::new(3, 2),
            Self::Enterprise => Decimal::new(1, 2),
        }
    }
}

impl Default for PlanTier {
    /// Sellers without an explicit subscription record are billed at the
    /// professional rate.
    fn default() -> Self {
        Self::Professional
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starter => write!(f, "starter"),
            Self::Professional => write!(f, "professional"),
            Self::Enterprise => write!(f, "enterprise"),
        }
    }
}

impl FromStr for PlanTier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starter" => Ok(Self::Starter),
            "professional" => Ok(Self::Professional),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(AppError::validation(format!("Unknown plan tier: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_rates() {
        assert_eq!(PlanTier::Starter.fee_rate(), Decimal::new(5, 2));
        assert_eq!(PlanTier::Professional.fee_rate(), Decimal::new(3, 2));
        assert_eq!(PlanTier::Enterprise.fee_rate(), Decimal::new(1, 2));
    }

    #[test]
    fn test_default_is_professional() {
        assert_eq!(PlanTier::default(), PlanTier::Professional);
    }

    #[test]
    fn test_parse_roundtrip() {
        for tier in [
            PlanTier::Starter,
            PlanTier::Professional,
            PlanTier::Enterprise,
        ] {
            let parsed: PlanTier = tier.to_string().parse().expect("should parse");
            assert_eq!(parsed, tier);
        }
    }
}
