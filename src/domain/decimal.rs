//! Exact decimal values for measurement quantities
//!
//! Instrument exports carry values like `7.2` or `13.20`. FHIR treats the
//! digits, including trailing zeros, as significant, so values are parsed with
//! [`rust_decimal`] (which keeps the scale) and never pass through a binary
//! float.

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A decimal number kept in exact textual form
///
/// Parsing accepts an optional sign, integer and/or fraction digits and an
/// optional exponent, ignoring surrounding whitespace. The stored text is the
/// canonical plain form of the value with its scale preserved, which is also
/// exactly what is written to JSON.
///
/// # Examples
///
/// ```
/// use labload::domain::Decimal;
///
/// let value: Decimal = "7.2".parse().unwrap();
/// assert_eq!(value.as_str(), "7.2");
///
/// let value: Decimal = " +007.50 ".parse().unwrap();
/// assert_eq!(value.as_str(), "7.50");
///
/// assert!("abc".parse::<Decimal>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(String);

impl Decimal {
    /// Parses a raw string into a decimal
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        let invalid = || format!("'{raw}' is not a decimal number");

        if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let value = if trimmed.contains(['e', 'E']) {
            rust_decimal::Decimal::from_scientific(trimmed)
        } else {
            rust_decimal::Decimal::from_str(trimmed)
        }
        .map_err(|_| invalid())?;

        Ok(Self(value.to_string()))
    }

    /// Returns the canonical decimal text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Decimal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Serialized as a JSON number carrying the exact digits
impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let number = serde_json::Number::from_str(&self.0).map_err(S::Error::custom)?;
        number.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = serde_json::Number::deserialize(deserializer)?;
        Decimal::parse(&number.to_string()).map_err(D::Error::custom)
    }
}
