use rust_decimal::Decimal;
use rust_decimal::prelude::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currency codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Inr,
}

impl Currency {
    /// Fixed conversion rate to USD. Rates are static by design; live quotes
    /// are out of scope.
    pub fn usd_rate(&self) -> Decimal {
        match self {
            Currency::Usd => dec!(1),
            Currency::Eur => dec!(1.08),
            Currency::Gbp => dec!(1.27),
            Currency::Jpy => dec!(0.0067),
            Currency::Inr => dec!(0.012),
        }
    }

    /// Convert an amount in this currency to USD.
    pub fn to_usd(&self, amount: Decimal) -> Decimal {
        amount * self.usd_rate()
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Inr => "INR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_is_identity() {
        assert_eq!(Currency::Usd.to_usd(dec!(42.50)), dec!(42.50));
    }

    #[test]
    fn test_fixed_rate_conversion() {
        assert_eq!(Currency::Eur.to_usd(dec!(100)), dec!(108.00));
        assert_eq!(Currency::Gbp.to_usd(dec!(10)), dec!(12.70));
    }

    #[test]
    fn test_serializes_as_uppercase_code() {
        let json = serde_json::to_string(&Currency::Eur).unwrap();
        assert_eq!(json, "\"EUR\"");

        let parsed: Currency = serde_json::from_str("\"GBP\"").unwrap();
        assert_eq!(parsed, Currency::Gbp);
    }
}
