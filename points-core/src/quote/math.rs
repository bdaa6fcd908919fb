//! Quote arithmetic.
//!
//! ```text
//! gross     = amount * price
//! net       = gross * funding_rate
//! receives  = net - gas_usd              (may go negative)
//! points    = max(0, floor(receives / usd_per_point))
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteInputs {
    pub asset_amount: Decimal,
    pub price_usd: Decimal,
    pub funding_rate: Decimal,
    pub estimated_gas_usd: Decimal,
    pub usd_per_point: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteBreakdown {
    pub gross_usd: Decimal,
    pub net_after_funding_rate: Decimal,
    pub estimated_gas_usd: Decimal,
    pub user_receives_usd: Decimal,
    pub points_credited: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("quote arithmetic overflowed")]
pub struct QuoteOverflow;

pub fn compute_quote(inputs: QuoteInputs) -> Result<QuoteBreakdown, QuoteOverflow> {
    let gross_usd = inputs
        .asset_amount
        .checked_mul(inputs.price_usd)
        .ok_or(QuoteOverflow)?;
    let net_after_funding_rate = gross_usd
        .checked_mul(inputs.funding_rate)
        .ok_or(QuoteOverflow)?;
    let user_receives_usd = net_after_funding_rate
        .checked_sub(inputs.estimated_gas_usd)
        .ok_or(QuoteOverflow)?;
    let points_credited = points_for(user_receives_usd, inputs.usd_per_point)?;

    Ok(QuoteBreakdown {
        gross_usd,
        net_after_funding_rate,
        estimated_gas_usd: inputs.estimated_gas_usd,
        user_receives_usd,
        points_credited,
    })
}

/// Whole points for a USD value, never negative.
pub fn points_for(usd: Decimal, usd_per_point: Decimal) -> Result<u64, QuoteOverflow> {
    if usd <= Decimal::ZERO {
        return Ok(0);
    }
    let points = usd.checked_div(usd_per_point).ok_or(QuoteOverflow)?.floor();
    Ok(points.to_u64().unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(amount: i64, price: i64, rate_tenths: i64, gas: i64) -> QuoteInputs {
        QuoteInputs {
            asset_amount: Decimal::new(amount, 0),
            price_usd: Decimal::new(price, 0),
            funding_rate: Decimal::new(rate_tenths, 1),
            estimated_gas_usd: Decimal::new(gas, 0),
            usd_per_point: Decimal::new(1, 2),
        }
    }

    #[test]
    fn test_pipeline_stages() {
        let q = compute_quote(inputs(2, 1500, 7, 10)).unwrap();
        assert_eq!(q.gross_usd, Decimal::new(3000, 0));
        assert_eq!(q.net_after_funding_rate, Decimal::new(2100, 0));
        assert_eq!(q.user_receives_usd, Decimal::new(2090, 0));
        assert_eq!(q.points_credited, 209_000);
    }

    #[test]
    fn test_negative_receives_passes_through_and_clamps_points() {
        let q = compute_quote(inputs(1, 1, 5, 3)).unwrap();
        assert_eq!(q.user_receives_usd, Decimal::new(-25, 1));
        assert_eq!(q.points_credited, 0);
    }

    #[test]
    fn test_points_are_floored() {
        assert_eq!(points_for(Decimal::new(12_999, 3), Decimal::ONE).unwrap(), 12);
        assert_eq!(points_for(Decimal::new(5, 3), Decimal::new(1, 2)).unwrap(), 0);
    }

    #[test]
    fn test_points_monotonic_in_price_and_rate() {
        let mut last = 0;
        for price in [1, 2, 5, 10, 50, 100, 1000] {
            let q = compute_quote(inputs(3, price, 7, 4)).unwrap();
            assert!(q.points_credited >= last);
            last = q.points_credited;
        }

        let mut last = 0;
        for rate in 1..=10 {
            let q = compute_quote(inputs(3, 100, rate, 4)).unwrap();
            assert!(q.points_credited >= last);
            last = q.points_credited;
        }
    }

    #[test]
    fn test_overflow_is_reported() {
        let q = compute_quote(QuoteInputs {
            asset_amount: Decimal::MAX,
            price_usd: Decimal::new(2, 0),
            funding_rate: Decimal::ONE,
            estimated_gas_usd: Decimal::ZERO,
            usd_per_point: Decimal::ONE,
        });
        assert_eq!(q, Err(QuoteOverflow));
    }
}
