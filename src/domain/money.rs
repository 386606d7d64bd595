//! Monetary amounts.
//!
//! Every amount is an integer count of minor currency units (paise), the same
//! convention the database columns use. Values enter the system only through
//! [`Money::try_from`] on a [`Decimal`], so request payloads like `"1250.5"`
//! or `1250.50` are parsed once at the boundary and never touch floating point.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::shared::errors::DomainError;

/// Minor units per major unit.
const MINOR_PER_MAJOR: i64 = 100;
const SCALE: u32 = 2;

/// Largest accepted absolute amount (10^12 major units).
const MAX_MAJOR: i64 = 1_000_000_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount {0} has more than two decimal places")]
    TooPrecise(Decimal),
    #[error("amount {0} is out of range")]
    OutOfRange(Decimal),
    #[error("amount must not be negative, got {0}")]
    Negative(Decimal),
}

impl From<MoneyError> for DomainError {
    fn from(e: MoneyError) -> Self {
        DomainError::Validation(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Whole major units, e.g. `Money::from_major(600)` is 600.00.
    pub const fn from_major(major: i64) -> Self {
        Self(major * MINOR_PER_MAJOR)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, SCALE)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Parse a non-negative amount, the rule for every input field except
    /// adjustments.
    pub fn non_negative(value: Decimal) -> Result<Self, MoneyError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyError::Negative(value));
        }
        Self::try_from(value)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let normalized = value.normalize();
        if normalized.scale() > SCALE {
            return Err(MoneyError::TooPrecise(value));
        }
        if normalized.abs() > Decimal::from(MAX_MAJOR) {
            return Err(MoneyError::OutOfRange(value));
        }
        (normalized * Decimal::from(MINOR_PER_MAJOR))
            .to_i64()
            .map(Money)
            .ok_or(MoneyError::OutOfRange(value))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parses_two_decimal_places() {
        assert_eq!(Money::try_from(dec("1250.5")).unwrap().minor(), 125_050);
        assert_eq!(Money::try_from(dec("1250.50")).unwrap().minor(), 125_050);
        assert_eq!(Money::try_from(dec("7")).unwrap(), Money::from_major(7));
    }

    #[test]
    fn trailing_zeros_beyond_scale_are_accepted() {
        assert_eq!(Money::try_from(dec("3.1000")).unwrap().minor(), 310);
    }

    #[test]
    fn rejects_sub_minor_precision() {
        assert!(matches!(
            Money::try_from(dec("0.001")),
            Err(MoneyError::TooPrecise(_))
        ));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            Money::try_from(dec("1000000000001")),
            Err(MoneyError::OutOfRange(_))
        ));
    }

    #[test]
    fn non_negative_rejects_negative_amounts() {
        assert!(matches!(
            Money::non_negative(dec("-5")),
            Err(MoneyError::Negative(_))
        ));
        assert_eq!(Money::non_negative(dec("0")).unwrap(), Money::ZERO);
    }

    #[test]
    fn arithmetic_and_display() {
        let a = Money::from_major(1000);
        let b = Money::from_major(400);
        assert_eq!((a - b).to_string(), "600.00");
        assert_eq!((b - a).to_string(), "-600.00");
        let total: Money = [a, b, Money::from_minor(5)].into_iter().sum();
        assert_eq!(total.minor(), 140_005);
    }
}
