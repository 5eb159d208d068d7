//! # Measurement Arithmetic
//!
//! Rounding helpers shared by the rate normalizer and the internal price table.
//!
//! All measurements are carried as [`Decimal`] so that values such as
//! `1000 / 6000` round predictably (`0.17`), independent of binary floating
//! point representation.
//!
//! # Examples
//!
//! ```
//! use shipping_rates::domain::value_objects::arithmetic::{div_round, round_2dp, Rounding};
//! use rust_decimal::Decimal;
//!
//! let volumetric = div_round(Decimal::new(1000, 0), Decimal::new(6000, 0), Rounding::HalfUp).unwrap();
//! assert_eq!(volumetric, Decimal::new(17, 2));
//! assert_eq!(round_2dp(Decimal::new(1005, 3)), Decimal::new(101, 2));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of decimal places used for every normalized measurement.
pub const MEASURE_DP: u32 = 2;

/// Error type for arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Division by zero attempted.
    #[error("division by zero")]
    DivisionByZero,
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Rounding mode for division results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Round to [`MEASURE_DP`] places, halves away from zero.
    HalfUp,
    /// Round up to the next whole unit (ceiling for positive values).
    CeilWhole,
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HalfUp => write!(f, "HalfUp"),
            Self::CeilWhole => write!(f, "CeilWhole"),
        }
    }
}

/// Rounds to two decimal places, halves away from zero.
#[inline]
#[must_use]
pub fn round_2dp(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MEASURE_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Divides with an explicit rounding mode.
///
/// # Errors
///
/// Returns `ArithmeticError::DivisionByZero` if the denominator is zero and
/// `ArithmeticError::Overflow` if the quotient does not fit.
#[inline]
pub fn div_round(
    numerator: Decimal,
    denominator: Decimal,
    rounding: Rounding,
) -> ArithmeticResult<Decimal> {
    if denominator.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }

    let quotient = numerator
        .checked_div(denominator)
        .ok_or(ArithmeticError::Overflow)?;

    Ok(match rounding {
        Rounding::HalfUp => round_2dp(quotient),
        Rounding::CeilWhole => quotient.ceil(),
    })
}

/// Multiplies, reporting overflow instead of panicking.
///
/// # Errors
///
/// Returns `ArithmeticError::Overflow` if the product does not fit.
#[inline]
pub fn checked_mul(lhs: Decimal, rhs: Decimal) -> ArithmeticResult<Decimal> {
    lhs.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn half_up_rounds_midpoint_away_from_zero() {
        assert_eq!(round_2dp(Decimal::new(125, 3)), Decimal::new(13, 2));
        assert_eq!(round_2dp(Decimal::new(-125, 3)), Decimal::new(-13, 2));
        assert_eq!(round_2dp(Decimal::new(124, 3)), Decimal::new(12, 2));
    }

    #[test]
    fn div_round_half_up() {
        let q = div_round(Decimal::new(1000, 0), Decimal::new(6000, 0), Rounding::HalfUp).unwrap();
        assert_eq!(q, Decimal::new(17, 2));
    }

    #[test]
    fn div_round_ceil_whole() {
        let q = div_round(Decimal::new(21, 1), Decimal::ONE, Rounding::CeilWhole).unwrap();
        assert_eq!(q, Decimal::new(3, 0));
        let exact = div_round(Decimal::new(4, 0), Decimal::new(2, 0), Rounding::CeilWhole).unwrap();
        assert_eq!(exact, Decimal::new(2, 0));
    }

    #[test]
    fn div_by_zero() {
        assert_eq!(
            div_round(Decimal::ONE, Decimal::ZERO, Rounding::HalfUp),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn checked_mul_overflow() {
        assert_eq!(
            checked_mul(Decimal::MAX, Decimal::new(2, 0)),
            Err(ArithmeticError::Overflow)
        );
    }
}
