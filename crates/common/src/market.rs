//! Market code value object.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ISO-3166-1 alpha-2 country code the item is sold in.
///
/// Always stored upper-case, e.g. `PT`, `US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Market(String);

/// Returned when a string is not a two-letter country code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid market '{0}': expected an ISO-3166-1 alpha-2 code")]
pub struct InvalidMarket(pub String);

impl Market {
    /// Parses a market code, normalising it to upper case.
    pub fn parse(code: &str) -> Result<Self, InvalidMarket> {
        if code.len() == 2 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(InvalidMarket(code.to_string()))
        }
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Market {
    type Err = InvalidMarket;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Market {
    type Error = InvalidMarket;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Market> for String {
    fn from(market: Market) -> Self {
        market.0
    }
}

impl AsRef<str> for Market {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalises_case() {
        assert_eq!(Market::parse("pt").unwrap().as_str(), "PT");
        assert_eq!(Market::parse("Us").unwrap().as_str(), "US");
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        assert!(Market::parse("").is_err());
        assert!(Market::parse("P").is_err());
        assert!(Market::parse("PRT").is_err());
        assert!(Market::parse("P1").is_err());
        assert!(Market::parse("ÉU").is_err());
    }

    #[test]
    fn deserialize_validates() {
        let market: Market = serde_json::from_str("\"gb\"").unwrap();
        assert_eq!(market.as_str(), "GB");
        assert!(serde_json::from_str::<Market>("\"GBR\"").is_err());
    }
}
