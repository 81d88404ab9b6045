//! Fixed-point helpers for native token amounts
//!
//! Amounts are `u64` counts of a token's smallest unit. Products of two
//! amounts are formed in `u128`, which cannot overflow, and narrowed back
//! with an explicit error instead of truncation.
//!
//! ## Rounding
//!
//! - Amounts paid out to a user round **down** ([`mul_div_floor`])
//! - Amounts charged to a user round **up** ([`mul_div_ceil`])
//! - Display ratios use [`Decimal`] and never flow back into amount math

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{AmmError, Result};
use crate::MAX_DECIMALS;

/// `floor(a * b / denominator)`
pub fn mul_div_floor(a: u64, b: u64, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(AmmError::invalid_input("division by zero"));
    }
    Ok(u128::from(a) * u128::from(b) / denominator)
}

/// `ceil(a * b / denominator)`
pub fn mul_div_ceil(a: u64, b: u64, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(AmmError::invalid_input("division by zero"));
    }
    Ok(div_ceil(u128::from(a) * u128::from(b), denominator))
}

/// `ceil(numerator / denominator)` for a non-zero denominator
#[inline]
pub fn div_ceil(numerator: u128, denominator: u128) -> u128 {
    let quotient = numerator / denominator;
    if numerator % denominator == 0 {
        quotient
    } else {
        quotient + 1
    }
}

/// Narrow an intermediate back to an amount
pub fn to_amount(value: u128, what: &str) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| AmmError::invalid_input(format!("{} {} exceeds the amount range", what, value)))
}

/// Integer square root, rounded down
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }

    // Newton's method from an over-estimate converges monotonically downward
    let mut x = 1u128 << ((128 - n.leading_zeros() + 1) / 2);
    loop {
        let next = (x + n / x) / 2;
        if next >= x {
            return x;
        }
        x = next;
    }
}

/// `numerator / denominator` as a display ratio
pub fn ratio(numerator: u64, denominator: u64) -> Result<Decimal> {
    Decimal::from(numerator)
        .checked_div(Decimal::from(denominator))
        .ok_or_else(|| AmmError::invalid_input("ratio with zero denominator"))
}

/// `part / whole * 100`
pub fn percent(part: u64, whole: u64) -> Result<Decimal> {
    Ok(ratio(part, whole)? * dec!(100))
}

/// Convert native units to a display quantity (`1_500_000` at 6 decimals is `1.5`)
pub fn to_display(amount: u64, decimals: u8) -> Result<Decimal> {
    if decimals > MAX_DECIMALS {
        return Err(AmmError::invalid_input(format!("{} decimals is out of range", decimals)));
    }
    Ok(Decimal::from_i128_with_scale(
        i128::from(amount),
        u32::from(decimals),
    ))
}

/// Convert a display quantity to native units, rounding toward zero
pub fn from_display(value: Decimal, decimals: u8) -> Result<u64> {
    if value.is_sign_negative() {
        return Err(AmmError::invalid_input(format!(
            "display amount {} is negative",
            value
        )));
    }

    let scale = 10u64
        .checked_pow(u32::from(decimals))
        .ok_or_else(|| AmmError::invalid_input(format!("{} decimals is out of range", decimals)))?;

    value
        .checked_mul(Decimal::from(scale))
        .and_then(|scaled| scaled.trunc().to_u64())
        .ok_or_else(|| {
            AmmError::invalid_input(format!(
                "display amount {} exceeds the amount range at {} decimals",
                value, decimals
            ))
        })
}
