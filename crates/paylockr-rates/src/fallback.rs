//! Static fallback exchange rates.
//!
//! Used when no live rate table has ever been fetched and the fetch
//! fails. These are deliberately coarse; rates are advisory within the
//! cache TTL and the charged amount snapshots whatever rate was used.

use rust_decimal::Decimal;

use paylockr_core::types::Currency;

/// The USD-relative fallback rate for a currency.
pub fn fallback_rate(currency: Currency) -> Decimal {
    match currency {
        Currency::Usd => Decimal::ONE,
        Currency::Eur => Decimal::new(85, 2),
        Currency::Gbp => Decimal::new(73, 2),
        Currency::Ngn => Decimal::new(4110, 1),
        Currency::Ghs => Decimal::new(58, 1),
        Currency::Kes => Decimal::new(110, 0),
        Currency::Zar => Decimal::new(152, 1),
        Currency::Cad => Decimal::new(125, 2),
        Currency::Aud => Decimal::new(135, 2),
    }
}
