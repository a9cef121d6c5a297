//! Type-safe price representation using decimal arithmetic.
//!
//! All marketplace prices are Indian rupees. Amounts are kept as
//! [`Decimal`] so cart totals never pick up floating point drift.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul};
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A rupee amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Currency symbol used when rendering prices.
    pub const SYMBOL: &'static str = "₹";

    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub fn rupees(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Create a price from paise (hundredths of a rupee).
    #[must_use]
    pub fn from_paise(paise: i64) -> Self {
        Self(Decimal::new(paise, 2))
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display (e.g., "₹120.00").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", Self::SYMBOL, self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        self.times(rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::rupees(120).display(), "₹120.00");
        assert_eq!("12.5".parse::<Price>().unwrap().display(), "₹12.50");
    }

    #[test]
    fn test_from_paise() {
        assert_eq!(Price::from_paise(1299), "12.99".parse().unwrap());
        assert_eq!(Price::from_paise(-50), "-0.50".parse().unwrap());
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::rupees(120).times(2), Price::rupees(55)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::rupees(295));
    }

    #[test]
    fn test_is_positive() {
        assert!(Price::rupees(1).is_positive());
        assert!(!Price::ZERO.is_positive());
        assert!(!Price::rupees(-3).is_positive());
    }

    #[test]
    fn test_deserializes_from_string_amount() {
        let price: Price = serde_json::from_str("\"35\"").unwrap();
        assert_eq!(price, Price::rupees(35));
    }
}
