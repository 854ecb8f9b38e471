use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::UnderwritingError;
use crate::types::{Money, Rate};
use crate::CoreResult;

/// Fixed-rate payment that fully retires `principal` over `periods` payments.
///
/// Uses `r * P / (1 - (1 + r)^-n)`. A zero rate falls back to straight-line
/// repayment, since the annuity term is exactly zero in that limit.
pub fn amortized_payment(principal: Money, periodic_rate: Rate, periods: u32) -> CoreResult<Money> {
    if periods == 0 {
        return Err(UnderwritingError::invalid(
            "periods",
            "> 0",
            Some(periods.to_string()),
        ));
    }

    if principal < Decimal::ZERO {
        return Err(UnderwritingError::invalid(
            "principal",
            ">= 0",
            Some(principal.to_string()),
        ));
    }

    if periodic_rate < Decimal::ZERO {
        return Err(UnderwritingError::invalid(
            "periodic_rate",
            ">= 0",
            Some(periodic_rate.to_string()),
        ));
    }

    let n = Decimal::from(periods);

    if periodic_rate.is_zero() {
        return Ok(principal / n);
    }

    let annuity_factor = Decimal::ONE - discount_factor(periodic_rate, periods);

    // Rate below decimal resolution: (1 + r) rounded to exactly 1.
    if annuity_factor.is_zero() {
        return Ok(principal / n);
    }

    periodic_rate
        .checked_mul(principal)
        .and_then(|interest| interest.checked_div(annuity_factor))
        .ok_or_else(|| {
            UnderwritingError::invalid(
                "periodic_rate",
                "small enough to amortize within decimal range",
                Some(periodic_rate.to_string()),
            )
        })
}

/// `(1 + r)^-n`, evaluated as `(1 / (1 + r))^n` so long terms shrink toward
/// zero instead of overflowing.
fn discount_factor(periodic_rate: Rate, periods: u32) -> Decimal {
    let per_period = Decimal::ONE / (Decimal::ONE + periodic_rate);
    // underflow
    per_period
        .checked_powu(u64::from(periods))
        .unwrap_or(Decimal::ZERO)
}
