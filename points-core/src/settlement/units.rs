//! Decimal amounts to integer base units.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnitsError {
    #[error("amount must be a positive number")]
    NotPositive,
    #[error("amount has more than {decimals} decimal places")]
    TooPrecise { decimals: u8 },
    #[error("amount does not fit in 256 bits")]
    Overflow,
}

/// `amount * 10^decimals`, exact.
///
/// Amounts that would need rounding are rejected rather than truncated.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<U256, UnitsError> {
    if amount <= Decimal::ZERO {
        return Err(UnitsError::NotPositive);
    }
    let amount = amount.normalize();
    let scale = amount.scale();
    if scale > u32::from(decimals) {
        return Err(UnitsError::TooPrecise { decimals });
    }
    let mantissa = u128::try_from(amount.mantissa()).map_err(|_| UnitsError::NotPositive)?;
    let shift = U256::from(10u8)
        .checked_pow(U256::from(u32::from(decimals) - scale))
        .ok_or(UnitsError::Overflow)?;
    U256::from(mantissa)
        .checked_mul(shift)
        .ok_or(UnitsError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_whole_and_fractional_amounts() {
        assert_eq!(
            to_base_units(Decimal::new(15, 1), 6).unwrap(),
            U256::from(1_500_000u64)
        );
        assert_eq!(
            to_base_units(Decimal::ONE, 18).unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
        // trailing zeros do not count as precision
        assert_eq!(
            to_base_units(Decimal::from_str("2.500000000").unwrap(), 1).unwrap(),
            U256::from(25u8)
        );
    }

    #[test]
    fn test_rejects_excess_precision() {
        assert_eq!(
            to_base_units(Decimal::from_str("0.0000001").unwrap(), 6),
            Err(UnitsError::TooPrecise { decimals: 6 })
        );
    }

    #[test]
    fn test_rejects_non_positive() {
        assert_eq!(to_base_units(Decimal::ZERO, 6), Err(UnitsError::NotPositive));
        assert_eq!(
            to_base_units(Decimal::NEGATIVE_ONE, 6),
            Err(UnitsError::NotPositive)
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(to_base_units(Decimal::MAX, 255), Err(UnitsError::Overflow));
    }
}
