use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::AgFinanceError;
use crate::types::{Money, Percent, Rate};
use crate::AgFinanceResult;

/// Monthly compounding periods in a year.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Convert a quoted annual percentage (5.5 = 5.5%) into a per-period rate.
pub fn periodic_rate(annual_percent: Percent, periods_per_year: u32) -> Rate {
    annual_percent / dec!(100) / Decimal::from(periods_per_year)
}

/// (1 + rate)^nper by checked squaring (integer exponent, no powd drift).
///
/// Takes O(log nper) multiplications. Fails instead of panicking when the
/// factor leaves the Decimal range.
pub fn growth_factor(rate: Rate, nper: u32) -> AgFinanceResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| {
            AgFinanceError::invalid(
                "interest_rate",
                format!("(1 + {rate})^{nper} exceeds the representable range"),
            )
        })
}

/// Level payment that retires `principal` over `nper` periods at `rate`.
///
/// Positive for a positive principal. A zero rate splits the principal evenly.
pub fn level_payment(rate: Rate, nper: u32, principal: Money) -> AgFinanceResult<Money> {
    if nper == 0 {
        return Err(AgFinanceError::invalid(
            "term_months",
            "Number of periods must be > 0",
        ));
    }
    if rate < Decimal::ZERO {
        return Err(AgFinanceError::invalid(
            "interest_rate",
            "Periodic rate cannot be negative",
        ));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    // 1 + rate is exact for any positive Decimal rate, so the factor stays
    // above one and the denominator is non-zero.
    let factor = growth_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;

    let numerator = rate.checked_mul(factor).ok_or_else(|| {
        AgFinanceError::invalid("interest_rate", "Payment factor overflow")
    })?;
    principal
        .checked_mul(numerator)
        .and_then(|scaled| scaled.checked_div(denominator))
        .ok_or_else(|| AgFinanceError::invalid("principal", "Payment overflow"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_periodic_rate_monthly() {
        assert_eq!(periodic_rate(dec!(6), MONTHS_PER_YEAR), dec!(0.005));
        assert_eq!(periodic_rate(dec!(0), MONTHS_PER_YEAR), Decimal::ZERO);
    }

    #[test]
    fn test_growth_factor_small_exponents() {
        assert_eq!(growth_factor(dec!(0.1), 0).unwrap(), Decimal::ONE);
        assert_eq!(growth_factor(dec!(0.1), 2).unwrap(), dec!(1.21));
        assert_eq!(growth_factor(dec!(0), 360).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_growth_factor_overflow_is_an_error() {
        let err = growth_factor(dec!(10), 1000).unwrap_err();
        assert!(matches!(err, AgFinanceError::InvalidInput { .. }));
    }

    #[test]
    fn test_growth_factor_huge_exponent_is_fast() {
        let start = std::time::Instant::now();
        let factor = growth_factor(Decimal::new(1, 22), u32::MAX).unwrap();
        assert!(factor > Decimal::ONE);
        assert!(factor < dec!(1.000001));
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_growth_factor_matches_repeated_multiplication() {
        let rate = dec!(0.0045833333333333333333333333);
        let mut expected = Decimal::ONE;
        for _ in 0..360 {
            expected *= Decimal::ONE + rate;
        }
        let diff = (growth_factor(rate, 360).unwrap() - expected).abs();
        assert!(diff < dec!(0.000000000000000001), "diff {diff}");
    }

    #[test]
    fn test_level_payment_smallest_positive_rate() {
        // 1e-28 per period is the finest Decimal step.
        let pmt = level_payment(Decimal::new(1, 28), 12, dec!(1200)).unwrap();
        assert!((pmt - dec!(100)).abs() < dec!(0.01), "got {pmt}");
    }

    #[test]
    fn test_level_payment_textbook() {
        // 200k at 6%/12 over 30 years ≈ 1199.10
        let pmt = level_payment(dec!(0.005), 360, dec!(200_000)).unwrap();
        assert_eq!(pmt.round_dp(2), dec!(1199.10));
    }

    #[test]
    fn test_level_payment_zero_rate() {
        let pmt = level_payment(Decimal::ZERO, 4, dec!(1000)).unwrap();
        assert_eq!(pmt, dec!(250));
    }

    #[test]
    fn test_level_payment_rejects_zero_periods() {
        assert!(level_payment(dec!(0.01), 0, dec!(1000)).is_err());
    }

    #[test]
    fn test_level_payment_rejects_negative_rate() {
        assert!(level_payment(dec!(-0.01), 12, dec!(1000)).is_err());
    }
}
