//! Supported settlement currencies.
//!
//! The set matches the currencies the platform can quote and the payment
//! gateway can charge. Rates for anything outside this set are never
//! cached, so an unsupported code is rejected at the API boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A supported ISO 4217 currency code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "currency", rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar.
    Usd,
    /// Euro.
    Eur,
    /// British Pound.
    Gbp,
    /// Nigerian Naira.
    Ngn,
    /// Ghanaian Cedi.
    Ghs,
    /// Kenyan Shilling.
    Kes,
    /// South African Rand.
    Zar,
    /// Canadian Dollar.
    Cad,
    /// Australian Dollar.
    Aud,
}

impl Currency {
    /// All supported currencies, in display order.
    pub const ALL: [Currency; 9] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Ngn,
        Currency::Ghs,
        Currency::Kes,
        Currency::Zar,
        Currency::Cad,
        Currency::Aud,
    ];

    /// The ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Ngn => "NGN",
            Self::Ghs => "GHS",
            Self::Kes => "KES",
            Self::Zar => "ZAR",
            Self::Cad => "CAD",
            Self::Aud => "AUD",
        }
    }

    /// Display symbol used when formatting amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
            Self::Ngn => "₦",
            Self::Ghs => "₵",
            Self::Kes => "KSh",
            Self::Zar => "R",
            Self::Cad => "C$",
            Self::Aud => "A$",
        }
    }

    /// Human-readable currency name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Usd => "US Dollar",
            Self::Eur => "Euro",
            Self::Gbp => "British Pound",
            Self::Ngn => "Nigerian Naira",
            Self::Ghs => "Ghanaian Cedi",
            Self::Kes => "Kenyan Shilling",
            Self::Zar => "South African Rand",
            Self::Cad => "Canadian Dollar",
            Self::Aud => "Australian Dollar",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "NGN" => Ok(Self::Ngn),
            "GHS" => Ok(Self::Ghs),
            "KES" => Ok(Self::Kes),
            "ZAR" => Ok(Self::Zar),
            "CAD" => Ok(Self::Cad),
            "AUD" => Ok(Self::Aud),
            other => Err(AppError::validation(format!(
                "Unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for currency in Currency::ALL {
            let parsed: Currency = currency.code().parse().expect("should parse");
            assert_eq!(parsed, currency);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::Eur);
    }

    #[test]
    fn test_unsupported_code_is_rejected() {
        let err = "JPY".parse::<Currency>().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Validation);
    }

    #[test]
    fn test_serde_uses_iso_code() {
        let json = serde_json::to_string(&Currency::Ngn).unwrap();
        assert_eq!(json, "\"NGN\"");
    }
}
