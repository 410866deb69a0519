//! Type-safe price representation.
//!
//! The store sells in a single currency (Czech koruna) and every price in the
//! catalog is a whole number of the smallest unit the store displays. Prices
//! are therefore plain non-negative integers; no conversion ever happens.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// Display suffix for the store currency.
pub const CURRENCY_SYMBOL: &str = "Kč";

/// A non-negative amount in the store currency.
///
/// ```
/// use vira_core::Price;
///
/// let line = Price::new(890) * 3;
/// assert_eq!(line.amount(), 2670);
/// assert_eq!(line.to_string(), "2670 Kč");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Zero in the store currency.
    pub const ZERO: Self = Self(0);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// The raw amount.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Whether this price is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {CURRENCY_SYMBOL}", self.0)
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0.saturating_mul(u64::from(rhs)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_store_currency() {
        assert_eq!(Price::new(129).to_string(), "129 Kč");
        assert_eq!(Price::ZERO.to_string(), "0 Kč");
    }

    #[test]
    fn test_sum() {
        let total: Price = [850, 2490, 3500].into_iter().map(Price::new).sum();
        assert_eq!(total, Price::new(6840));
    }

    #[test]
    fn test_mul_saturates() {
        assert_eq!(Price::new(u64::MAX) * 2, Price::new(u64::MAX));
    }
}
