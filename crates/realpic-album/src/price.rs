//! Monetary amounts in USD cents

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Price in whole cents
///
/// Displays with two decimals (`9.00`, `0.99`), the form sent to the
/// checkout endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u32);

impl Price {
    /// Price from cents
    #[inline]
    #[must_use]
    pub const fn from_cents(cents: u32) -> Self {
        Self(cents)
    }

    /// Price from whole dollars
    #[inline]
    #[must_use]
    pub const fn from_dollars(dollars: u32) -> Self {
        Self(dollars * 100)
    }

    /// Amount in cents
    #[inline]
    #[must_use]
    pub const fn cents(&self) -> u32 {
        self.0
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Malformed decimal price
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid price: {0:?}")]
pub struct PriceParseError(pub String);

impl FromStr for Price {
    type Err = PriceParseError;

    /// Parses `9`, `9.5` or `9.50`; at most two fractional digits
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PriceParseError(s.to_string());
        let trimmed = s.trim();
        let (whole, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        if whole.is_empty() || frac.len() > 2 || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        if !frac.chars().all(|c| c.is_ascii_digit()) || (trimmed.contains('.') && frac.is_empty()) {
            return Err(err());
        }

        let dollars: u32 = whole.parse().map_err(|_| err())?;
        let cents: u32 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u32>().map_err(|_| err())? * 10,
            _ => frac.parse().map_err(|_| err())?,
        };

        dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Self)
            .ok_or_else(err)
    }
}
