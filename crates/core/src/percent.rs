//! Discount Percentages

use std::{fmt, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a [`DiscountPercent`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PercentError {
    /// The value fell outside `0..=100`.
    #[error("discount must be between 0 and 100, got {0}")]
    OutOfRange(Decimal),

    /// The value could not be parsed as a decimal number.
    #[error("discount is not a number: {0}")]
    Parse(String),
}

/// A discount expressed in percent points, guaranteed to lie within `0..=100`.
///
/// A `DiscountPercent` of `20` means "20% off". Stored values (vendor defaults,
/// product overrides, bulk tiers) are always validated through this type; only the
/// resolver's combined result may exceed 100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct DiscountPercent(Decimal);

impl DiscountPercent {
    /// No discount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The full price off.
    pub const MAX: Self = Self(Decimal::ONE_HUNDRED);

    /// Create a validated discount from percent points.
    ///
    /// # Errors
    ///
    /// Returns [`PercentError::OutOfRange`] when `points` is negative or above 100.
    pub fn new(points: Decimal) -> Result<Self, PercentError> {
        if points < Decimal::ZERO || points > Decimal::ONE_HUNDRED {
            return Err(PercentError::OutOfRange(points));
        }

        Ok(Self(points.normalize()))
    }

    /// Percent points, e.g. `20` for 20%.
    pub const fn points(self) -> Decimal {
        self.0
    }

    /// The discount as a fraction of the price, e.g. `0.2` for 20%.
    pub fn fraction(self) -> Percentage {
        Percentage::from(self.0 / Decimal::ONE_HUNDRED)
    }

    /// Whether this discount takes nothing off.
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<Decimal> for DiscountPercent {
    type Error = PercentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<u8> for DiscountPercent {
    type Error = PercentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(Decimal::from(value))
    }
}

impl From<DiscountPercent> for Decimal {
    fn from(value: DiscountPercent) -> Self {
        value.0
    }
}

impl FromStr for DiscountPercent {
    type Err = PercentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('%').trim_end();

        let points =
            Decimal::from_str(trimmed).map_err(|error| PercentError::Parse(error.to_string()))?;

        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn accepts_bounds() -> TestResult {
        assert_eq!(DiscountPercent::new(Decimal::ZERO)?, DiscountPercent::ZERO);
        assert_eq!(DiscountPercent::new(Decimal::ONE_HUNDRED)?, DiscountPercent::MAX);

        Ok(())
    }

    #[test]
    fn rejects_negative_values() {
        let result = DiscountPercent::new(Decimal::NEGATIVE_ONE);

        assert_eq!(result, Err(PercentError::OutOfRange(Decimal::NEGATIVE_ONE)));
    }

    #[test]
    fn rejects_values_over_one_hundred() {
        assert!(DiscountPercent::try_from(101_u8).is_err());
        assert!(DiscountPercent::from_str("100.01").is_err());
    }

    #[test]
    fn parses_fractional_points_with_percent_sign() -> TestResult {
        let percent: DiscountPercent = "12.5%".parse()?;

        assert_eq!(percent.points(), Decimal::new(125, 1));

        Ok(())
    }

    #[test]
    fn parse_reports_malformed_input() {
        assert!(matches!(
            DiscountPercent::from_str("twenty"),
            Err(PercentError::Parse(_))
        ));
    }

    #[test]
    fn fraction_is_points_over_one_hundred() -> TestResult {
        let percent = DiscountPercent::try_from(25_u8)?;

        assert_eq!(percent.fraction() * Decimal::ONE, Decimal::new(25, 2));

        Ok(())
    }

    #[test]
    fn trailing_zeros_do_not_affect_equality() -> TestResult {
        let a = DiscountPercent::new(Decimal::new(2000, 2))?;
        let b = DiscountPercent::try_from(20_u8)?;

        assert_eq!(a, b);
        assert_eq!(a.to_string(), "20%");

        Ok(())
    }
}
