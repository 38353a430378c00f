use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// The number of fractional digits every amount is kept at
const SCALE: u32 = 2;

/// Possible errors to occur while creating or combining amounts
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("The amount value cannot be negative.")]
    NegativeAmount,
    #[error("The amount value is too large to be held with two fraction digits.")]
    Overflow,
}

/// A non-negative monetary value
///
/// Amounts are always held at exactly two fractional digits. Values with a
/// higher precision are rounded half-to-even once, when the amount is created,
/// so chained arithmetic never accumulates rounding drift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates an amount from a decimal value
    ///
    /// Fails with [`AmountError::NegativeAmount`] if the value is below zero and
    /// with [`AmountError::Overflow`] if it is too large to carry two
    /// fractional digits.
    pub fn of(value: Decimal) -> Result<Self, AmountError> {
        if value < Decimal::ZERO {
            return Err(AmountError::NegativeAmount);
        }

        Self::rounded(value)
    }

    /// An amount of `0.00`
    pub fn zero() -> Self {
        Self(Decimal::new(0, SCALE))
    }

    /// The underlying decimal value
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Adds two amounts
    ///
    /// Fails with [`AmountError::Overflow`] if the sum leaves the range of
    /// representable amounts.
    pub fn plus(&self, other: Amount) -> Result<Amount, AmountError> {
        let sum = self.0.checked_add(other.0).ok_or(AmountError::Overflow)?;
        Self::rounded(sum)
    }

    /// Subtracts `other` from this amount
    ///
    /// Fails with [`AmountError::NegativeAmount`] if `other` is larger than
    /// this amount.
    pub fn minus(&self, other: Amount) -> Result<Amount, AmountError> {
        Self::of(self.0 - other.0)
    }

    fn rounded(value: Decimal) -> Result<Self, AmountError> {
        let mut value = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointNearestEven);
        // rounding never widens the scale, `10` has to be shown as `10.00`
        value.rescale(SCALE);
        // rescale stops early when the mantissa has no room left
        if value.scale() != SCALE {
            return Err(AmountError::Overflow);
        }
        value.set_sign_positive(true);
        Ok(Self(value))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::of(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Possible errors to occur while parsing an amount from text
#[derive(Debug, thiserror::Error)]
pub enum ParseAmountError {
    #[error(transparent)]
    Decimal(#[from] rust_decimal::Error),
    #[error(transparent)]
    Amount(#[from] AmountError),
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::of(Decimal::from_str(s.trim())?)?)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
