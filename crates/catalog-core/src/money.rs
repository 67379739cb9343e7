//! # Money Module
//!
//! Catalog prices are stored and generated as integer cents. `Money` wraps
//! that integer so prices never pass through floating point on their way to
//! the database. Only the JSON wire form is decimal, see [`decimal`].
//!
//! ## Usage
//! ```rust
//! use catalog_core::money::Money;
//!
//! let price = Money::from_cents(1099);
//! assert_eq!(price.to_string(), "$10.99");
//! assert_eq!(price.cents(), 1099);
//! ```

use std::fmt;

/// A price in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Serde adapter for an integer-cent field that travels as a decimal price.
///
/// ```text
/// price_cents: 1999  ──serialize──►  "price": 19.99
/// "price": 19.99     ──deserialize─►  price_cents: 1999
/// ```
///
/// Use with `#[serde(with = "catalog_core::money::decimal")]`.
pub mod decimal {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(*cents as f64 / 100.0)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let price = f64::deserialize(deserializer)?;
        if !price.is_finite() || price < 0.0 {
            return Err(D::Error::custom("price must be a non-negative number"));
        }
        Ok((price * 100.0).round() as i64)
    }
}
