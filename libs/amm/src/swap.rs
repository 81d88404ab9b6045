//! Constant-product swap math with exact integer amounts
//!
//! Output amounts are rounded down and required inputs rounded up, so a
//! preview can never promise more than the ledger will settle.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AmmError, Result};
use crate::invariant::InvariantValidator;
use crate::precision::{mul_div_ceil, mul_div_floor, ratio, to_amount};
use crate::BPS_DENOMINATOR;

/// Preview of a single exact-input swap
///
/// Transient value: the engine never writes the new reserves anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapResult {
    /// Tokens paid out to the trader (native units, rounded down); zero for
    /// dust trades and inputs fully consumed by the fee
    pub output_amount: u64,
    /// Part of the input retained by the pool as fee (native units)
    pub fee_amount: u64,
    /// Deviation of the effective price from the spot price, in percent
    pub price_impact_pct: Decimal,
    /// `output_amount / input_amount`
    pub effective_price: Decimal,
    /// `reserve_out / reserve_in` before the trade
    pub spot_price: Decimal,
    pub new_reserve_in: u64,
    pub new_reserve_out: u64,
}

/// CPMM swap calculations
pub struct SwapCalculator;

impl SwapCalculator {
    /// Calculate the output of swapping `input_amount` into the pool
    ///
    /// # Arguments
    /// * `input_amount` - Gross input, fee included (native units)
    /// * `reserve_in` - Reserve of the token being sold
    /// * `reserve_out` - Reserve of the token being bought
    /// * `fee_bps` - Fee in basis points (30 = 0.3%)
    pub fn compute_swap_output(
        input_amount: u64,
        reserve_in: u64,
        reserve_out: u64,
        fee_bps: u32,
    ) -> Result<SwapResult> {
        ensure_positive(input_amount, "input amount")?;
        ensure_reserves(reserve_in, reserve_out)?;
        ensure_fee(fee_bps)?;

        // Fee is rounded toward zero, the remainder is traded
        let fee_amount = to_amount(
            mul_div_floor(input_amount, u64::from(fee_bps), u128::from(BPS_DENOMINATOR))?,
            "fee amount",
        )?;
        // A 100% fee leaves nothing to trade; the preview is a zero output
        let net_input = input_amount - fee_amount;

        // out = reserve_out * net / (reserve_in + net)
        let output_amount = to_amount(
            mul_div_floor(
                reserve_out,
                net_input,
                u128::from(reserve_in) + u128::from(net_input),
            )?,
            "output amount",
        )?;
        if output_amount >= reserve_out {
            return Err(AmmError::invariant_violation(format!(
                "output {} would drain reserve {}",
                output_amount, reserve_out
            )));
        }

        let new_reserve_in = reserve_in.checked_add(input_amount).ok_or_else(|| {
            AmmError::invalid_input(format!(
                "reserve {} plus input {} exceeds the amount range",
                reserve_in, input_amount
            ))
        })?;
        let new_reserve_out = reserve_out - output_amount;

        InvariantValidator::ensure_non_decreasing(
            reserve_in,
            reserve_out,
            new_reserve_in,
            new_reserve_out,
        )?;

        let (spot_price, effective_price, price_impact_pct) =
            Self::price_impact(input_amount, output_amount, reserve_in, reserve_out)?;

        Ok(SwapResult {
            output_amount,
            fee_amount,
            price_impact_pct,
            effective_price,
            spot_price,
            new_reserve_in,
            new_reserve_out,
        })
    }

    /// Calculate the minimal gross input that buys at least `output_amount`
    ///
    /// `compute_swap_output` on the returned input delivers `output_amount`
    /// or more; one unit less would not.
    pub fn compute_swap_input(
        output_amount: u64,
        reserve_in: u64,
        reserve_out: u64,
        fee_bps: u32,
    ) -> Result<u64> {
        ensure_positive(output_amount, "output amount")?;
        ensure_reserves(reserve_in, reserve_out)?;
        ensure_fee(fee_bps)?;
        if fee_bps == BPS_DENOMINATOR {
            return Err(AmmError::invalid_input(
                "a 100% fee leaves nothing to trade, no input can reach the output",
            ));
        }
        if output_amount >= reserve_out {
            return Err(AmmError::insufficient_liquidity(format!(
                "requested output {} meets or exceeds reserve {}",
                output_amount, reserve_out
            )));
        }

        // net = ceil(reserve_in * out / (reserve_out - out))
        let net_needed = mul_div_ceil(
            reserve_in,
            output_amount,
            u128::from(reserve_out - output_amount),
        )?;

        // Smallest gross with gross - floor(gross * fee / 10000) >= net.
        // That difference equals ceil(gross * (10000 - fee) / 10000), so
        // gross = floor((net - 1) * 10000 / (10000 - fee)) + 1
        let scaled = (net_needed - 1)
            .checked_mul(u128::from(BPS_DENOMINATOR))
            .ok_or_else(|| {
                AmmError::invalid_input(format!(
                    "required input for output {} exceeds the amount range",
                    output_amount
                ))
            })?;
        let gross = to_amount(
            scaled / u128::from(BPS_DENOMINATOR - fee_bps) + 1,
            "required input",
        )?;

        Ok(gross)
    }

    /// Spot price, effective price and price impact (percent)
    fn price_impact(
        input_amount: u64,
        output_amount: u64,
        reserve_in: u64,
        reserve_out: u64,
    ) -> Result<(Decimal, Decimal, Decimal)> {
        // effective <= spot  <=>  out * reserve_in <= in * reserve_out
        let effective_scaled = u128::from(output_amount) * u128::from(reserve_in);
        let spot_scaled = u128::from(input_amount) * u128::from(reserve_out);
        if effective_scaled > spot_scaled {
            return Err(AmmError::invariant_violation(format!(
                "negative price impact: out {} for in {} against reserves {}/{}",
                output_amount, input_amount, reserve_in, reserve_out
            )));
        }

        let spot_price = ratio(reserve_out, reserve_in)?;
        let effective_price = ratio(output_amount, input_amount)?;
        let impact = (spot_price - effective_price)
            .checked_div(spot_price)
            .map(|fraction| fraction * dec!(100))
            .ok_or_else(|| AmmError::invariant_violation("spot price rounded to zero"))?;

        // Exact sign was checked above; only decimal rounding can dip below zero
        Ok((spot_price, effective_price, impact.max(Decimal::ZERO)))
    }
}

/// Input left after the fee is taken
#[inline]
pub(crate) fn net_of_fee(input_amount: u64, fee_bps: u32) -> u64 {
    let fee = u128::from(input_amount) * u128::from(fee_bps) / u128::from(BPS_DENOMINATOR);
    // fee <= input_amount because fee_bps <= 10000
    input_amount - fee as u64
}

pub(crate) fn ensure_positive(amount: u64, what: &str) -> Result<()> {
    if amount == 0 {
        return Err(AmmError::invalid_input(format!("{} must be positive", what)));
    }
    Ok(())
}

pub(crate) fn ensure_reserves(reserve_in: u64, reserve_out: u64) -> Result<()> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::invalid_input(format!(
            "reserves must be positive, got {}/{} (pool not initialized)",
            reserve_in, reserve_out
        )));
    }
    Ok(())
}

pub(crate) fn ensure_fee(fee_bps: u32) -> Result<()> {
    if fee_bps > BPS_DENOMINATOR {
        return Err(AmmError::invalid_input(format!(
            "fee {} bps exceeds {} bps",
            fee_bps, BPS_DENOMINATOR
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::MAX_FEE_BPS;

    const UNIT: u64 = 1_000_000; // 6 decimals

    #[test]
    fn test_swap_output_balanced_pool() {
        let result =
            SwapCalculator::compute_swap_output(100 * UNIT, 10_000 * UNIT, 10_000 * UNIT, 30)
                .unwrap();

        assert_eq!(result.fee_amount, 300_000);
        // 10_000 * 99.7 / 10_099.7 = 98.715803...
        assert_eq!(result.output_amount, 98_715_803);
        assert_eq!(result.new_reserve_in, 10_100 * UNIT);
        assert_eq!(result.new_reserve_out, 10_000 * UNIT - 98_715_803);
        assert_eq!(result.spot_price, dec!(1));
        assert!(result.price_impact_pct > dec!(1.28));
        assert!(result.price_impact_pct < dec!(1.29));
    }

    #[test]
    fn test_swap_output_asymmetric_pool() {
        // Same shape as the 100 in / 1000:2000 reference case, scaled to 6 decimals
        let result =
            SwapCalculator::compute_swap_output(100 * UNIT, 1_000 * UNIT, 2_000 * UNIT, 30)
                .unwrap();

        // ~181.32 tokens out
        assert!(result.output_amount > 181_310_000);
        assert!(result.output_amount < 181_330_000);
        assert_eq!(result.spot_price, dec!(2));
    }

    #[test]
    fn test_zero_fee_has_no_fee_amount() {
        let result = SwapCalculator::compute_swap_output(1_000, 1_000_000, 1_000_000, 0).unwrap();
        assert_eq!(result.fee_amount, 0);
        // 1_000_000 * 1_000 / 1_001_000 = 999.000999
        assert_eq!(result.output_amount, 999);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let err = SwapCalculator::compute_swap_output(0, 1_000, 1_000, 30).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = SwapCalculator::compute_swap_output(10, 0, 1_000, 30).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = SwapCalculator::compute_swap_output(10, 1_000, 0, 30).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = SwapCalculator::compute_swap_output(10, 1_000, 1_000, 10_001).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_full_fee_quotes_zero_output() {
        let result =
            SwapCalculator::compute_swap_output(1_000, 1_000_000, 1_000_000, MAX_FEE_BPS).unwrap();

        assert_eq!(result.fee_amount, 1_000);
        assert_eq!(result.output_amount, 0);
        assert_eq!(result.effective_price, Decimal::ZERO);
        assert_eq!(result.price_impact_pct, dec!(100));
        assert_eq!(result.new_reserve_in, 1_001_000);
        assert_eq!(result.new_reserve_out, 1_000_000);
    }

    #[test]
    fn test_dust_trade_quotes_zero_output() {
        // 1 * 1000 / 1001 floors to zero
        let result = SwapCalculator::compute_swap_output(1, 1_000, 1_000, 30).unwrap();
        assert_eq!(result.fee_amount, 0);
        assert_eq!(result.output_amount, 0);
        assert_eq!(result.price_impact_pct, dec!(100));
        assert!(InvariantValidator::verify_invariant_non_decreasing(
            1_000,
            1_000,
            result.new_reserve_in,
            result.new_reserve_out
        ));
    }

    #[test]
    fn test_output_never_drains_reserve() {
        let result = SwapCalculator::compute_swap_output(u64::MAX / 2, 1_000, 1_000, 30).unwrap();
        assert!(result.output_amount < 1_000);
        assert!(result.new_reserve_out > 0);
        assert!(result.price_impact_pct > dec!(99));
    }

    #[test]
    fn test_reserve_overflow_rejected() {
        let err = SwapCalculator::compute_swap_output(u64::MAX, 1_000, 1_000, 30).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_swap_input_is_minimal() {
        let (reserve_in, reserve_out) = (10_000 * UNIT, 10_000 * UNIT);
        let target = 98_715_803;

        let input = SwapCalculator::compute_swap_input(target, reserve_in, reserve_out, 30).unwrap();
        let out = SwapCalculator::compute_swap_output(input, reserve_in, reserve_out, 30).unwrap();
        assert!(out.output_amount >= target);

        let short = SwapCalculator::compute_swap_output(input - 1, reserve_in, reserve_out, 30)
            .unwrap();
        assert!(short.output_amount < target);

        assert!(input <= 100 * UNIT);
    }

    #[test]
    fn test_swap_input_minimal_at_extreme_fee() {
        // net needed = ceil(1e7 / 999_990) = 11, and only 1 bps of each input is traded
        let input = SwapCalculator::compute_swap_input(10, 1_000_000, 1_000_000, 9_999).unwrap();
        assert_eq!(input, 100_001);
        assert_eq!(net_of_fee(input, 9_999), 11);
        assert_eq!(net_of_fee(input - 1, 9_999), 10);

        let out = SwapCalculator::compute_swap_output(input, 1_000_000, 1_000_000, 9_999).unwrap();
        assert_eq!(out.output_amount, 10);
        let short =
            SwapCalculator::compute_swap_output(input - 1, 1_000_000, 1_000_000, 9_999).unwrap();
        assert!(short.output_amount < 10);
    }

    #[test]
    fn test_swap_input_rejects_full_reserve() {
        let err = SwapCalculator::compute_swap_input(1_000, 1_000, 1_000, 30).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientLiquidity);

        let err = SwapCalculator::compute_swap_input(1_001, 1_000, 1_000, 30).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientLiquidity);
    }

    #[test]
    fn test_swap_input_rejects_full_fee() {
        let err = SwapCalculator::compute_swap_input(10, 1_000, 1_000, 10_000).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_net_of_fee() {
        assert_eq!(net_of_fee(10_000, 30), 9_970);
        assert_eq!(net_of_fee(100, 30), 100);
        assert_eq!(net_of_fee(333, 30), 333);
        assert_eq!(net_of_fee(334, 30), 333);
        assert_eq!(net_of_fee(334, 10_000), 0);
    }
}
