//! Pricing engine: currency conversion plus the tiered platform fee.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use paylockr_core::types::{Currency, PlanTier};

use crate::cache::RateCache;

/// The priced outcome of a checkout.
///
/// `exchange_rate` is part of the quote so the caller can persist the
/// exact rate the amounts were derived from; settled transactions are
/// audited against this snapshot, never against live rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Base amount converted into the target currency.
    pub converted_amount: Decimal,
    /// Platform fee on the converted amount.
    pub fee_amount: Decimal,
    /// Amount the gateway charges: converted + fee.
    pub total_amount: Decimal,
    /// The exchange rate the conversion used.
    pub exchange_rate: Decimal,
}

/// Converts amounts between currencies and applies the plan-tier fee.
///
/// Holds a reference to one shared [`RateCache`]; apart from that read
/// it is a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    rates: RateCache,
}

impl PricingEngine {
    /// Create a pricing engine backed by the given rate cache.
    pub fn new(rates: RateCache) -> Self {
        Self { rates }
    }

    /// Price a sale: convert, round, and apply the platform fee.
    pub async fn price(
        &self,
        base_amount: Decimal,
        base_currency: Currency,
        target_currency: Currency,
        plan: PlanTier,
    ) -> Quote {
        let exchange_rate = self.rates.rate(base_currency, target_currency).await;
        let converted_amount = round_money(base_amount * exchange_rate);
        let fee_amount = round_money(converted_amount * plan.fee_rate());

        Quote {
            converted_amount,
            fee_amount,
            total_amount: converted_amount + fee_amount,
            exchange_rate,
        }
    }

    /// Convert an amount without applying a fee.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
    ) -> Decimal {
        if from == to {
            return amount;
        }
        round_money(amount * self.rates.rate(from, to).await)
    }
}

/// Round to 2 decimal places, half-up.
fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
