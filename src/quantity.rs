pub mod cost;
pub mod energy;
pub mod power;
pub mod rate;

use std::ops::{Div, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Dimension-tagged scalar.
///
/// The const parameters carry the exponents of power, time, and cost, so
/// energy, unit prices, and money stay distinct types even though they all
/// wrap the same [`Decimal`] representation.
#[derive(
    Clone,
    Copy,
    Deserialize,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
pub struct Quantity<T, const POWER: isize, const TIME: isize, const COST: isize>(pub T);

impl<T, const POWER: isize, const TIME: isize, const COST: isize> Quantity<T, POWER, TIME, COST>
where
    Self: PartialOrd,
{
    pub fn min(mut self, rhs: Self) -> Self {
        if rhs < self {
            self = rhs;
        }
        self
    }

    pub fn max(mut self, rhs: Self) -> Self {
        if rhs > self {
            self = rhs;
        }
        self
    }
}

impl<const POWER: isize, const TIME: isize, const COST: isize> Quantity<Decimal, POWER, TIME, COST> {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[must_use]
    pub fn round_dp(self, dp: u32) -> Self {
        Self(self.0.round_dp(dp))
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl<T, const POWER: isize, const TIME: isize, const COST: isize> Mul<T>
    for Quantity<T, POWER, TIME, COST>
where
    T: Mul<T>,
{
    type Output = Quantity<T::Output, POWER, TIME, COST>;

    fn mul(self, rhs: T) -> Self::Output {
        Quantity(self.0 * rhs)
    }
}

impl<T, const POWER: isize, const TIME: isize, const COST: isize> Div<T>
    for Quantity<T, POWER, TIME, COST>
where
    T: Div<T>,
{
    type Output = Quantity<T::Output, POWER, TIME, COST>;

    fn div(self, rhs: T) -> Self::Output {
        Quantity(self.0 / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Bare = Quantity<Decimal, 0, 0, 0>;

    impl std::fmt::Debug for Bare {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }

    #[test]
    fn test_min() {
        assert_eq!(Bare::from(Decimal::ONE).min(Bare::from(Decimal::TWO)), Bare::from(Decimal::ONE));
        assert_eq!(Bare::from(Decimal::TWO).min(Bare::from(Decimal::ONE)), Bare::from(Decimal::ONE));
    }

    #[test]
    fn test_max() {
        assert_eq!(Bare::from(Decimal::ONE).max(Bare::from(Decimal::TWO)), Bare::from(Decimal::TWO));
        assert_eq!(Bare::from(Decimal::TWO).max(Bare::from(Decimal::ONE)), Bare::from(Decimal::TWO));
    }

    #[test]
    fn test_round_dp() {
        let value = Bare::from(Decimal::new(12_345, 4));
        assert_eq!(value.round_dp(2), Bare::from(Decimal::new(123, 2)));
    }
}
