//! Amount type for monetary values read from bank statements.
//!
//! Statements write amounts with thousands separators (`1,234,567`) or deliver them as numeric
//! cells. `Amount` wraps `Decimal` so that values survive the trip into storage without floating
//! point drift.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a monetary amount as found on a bank statement.
///
/// Parsing strips surrounding whitespace and `,` thousands separators. An empty string is zero.
///
/// ```
/// # use saoke::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1,234,567").unwrap();
/// assert_eq!(amount.to_string(), "1234567");
/// assert_eq!(amount.grouped(), "1,234,567.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount {
        value: Decimal::ZERO,
    };

    /// Creates a new Amount from a Decimal value.
    pub fn new(value: Decimal) -> Self {
        Self {
            value: value.normalize(),
        }
    }

    /// Parses `s` the way statement cells are read: anything that cannot be understood as a number
    /// becomes zero.
    pub fn parse_lenient(s: &str) -> Self {
        Amount::from_str(s).unwrap_or_default()
    }

    /// Converts a numeric spreadsheet cell. Non-finite values become zero.
    pub fn from_f64_lossy(n: f64) -> Self {
        Decimal::from_f64(n).map(Amount::new).unwrap_or_default()
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value.is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value.is_sign_negative()
    }

    /// Formats the amount with thousands separators and two decimals, e.g. `1,234,567.00`.
    pub fn grouped(&self) -> String {
        let (sign, num) = if self.is_negative() {
            ("-", self.value.abs())
        } else {
            ("", self.value)
        };
        format!(
            "{sign}{}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        let without_commas = trimmed.replace(',', "");
        let value = match Decimal::from_str(&without_commas) {
            Ok(value) => value,
            // Numeric cells rendered as text sometimes use exponent notation.
            Err(e) => Decimal::from_scientific(&without_commas).map_err(|_| AmountError(e))?,
        };
        Ok(Amount::new(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_thousands_separators() {
        let amount = Amount::from_str("1,234,567").unwrap();
        assert_eq!(amount.value(), dec("1234567"));
    }

    #[test]
    fn test_parse_with_fraction() {
        let amount = Amount::from_str(" 12,000.50 ").unwrap();
        assert_eq!(amount.value(), dec("12000.5"));
    }

    #[test]
    fn test_parse_empty_string() {
        let amount = Amount::from_str("").unwrap();
        assert!(amount.is_zero());
    }

    #[test]
    fn test_parse_scientific() {
        let amount = Amount::from_str("1.5e3").unwrap();
        assert_eq!(amount.value(), dec("1500"));
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(Amount::from_str("abc").is_err());
    }

    #[test]
    fn test_lenient_garbage_is_zero() {
        assert!(Amount::parse_lenient("abc").is_zero());
        assert!(Amount::parse_lenient("").is_zero());
        assert_eq!(Amount::parse_lenient("500,000").value(), dec("500000"));
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Amount::from_f64_lossy(1234567.0).value(), dec("1234567"));
        assert!(Amount::from_f64_lossy(f64::NAN).is_zero());
    }

    #[test]
    fn test_sign_checks() {
        assert!(Amount::from_str("5").unwrap().is_positive());
        assert!(!Amount::ZERO.is_positive());
        assert!(!Amount::ZERO.is_negative());
        assert!(Amount::from_str("-5").unwrap().is_negative());
    }

    #[test]
    fn test_display_drops_trailing_zeros() {
        assert_eq!(Amount::from_str("500000.00").unwrap().to_string(), "500000");
    }

    #[test]
    fn test_grouped() {
        assert_eq!(Amount::from_str("1234567").unwrap().grouped(), "1,234,567.00");
        assert_eq!(Amount::from_str("-60000").unwrap().grouped(), "-60,000.00");
    }

    #[test]
    fn test_serde() {
        let amount = Amount::from_str("1,000").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"1000\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
