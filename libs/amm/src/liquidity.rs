//! LP share accounting for deposits and withdrawals
//!
//! Policies:
//! - minted shares and withdrawn amounts round **down**
//! - amounts consumed from a depositor round **up**
//! - a proportional deposit mints the smaller of the two per-side share
//!   counts, so an imbalanced deposit cannot dilute existing LPs

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AmmError, Result};
use crate::precision::{isqrt, mul_div_ceil, mul_div_floor, percent, to_amount};
use crate::swap::{ensure_positive, ensure_reserves};
use crate::MINIMUM_LIQUIDITY;

/// Which minting rule a deposit used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidityRegime {
    /// First deposit: `sqrt(x * y) - MINIMUM_LIQUIDITY`
    Bootstrap,
    /// Seeded pool: `min(S * dx / x, S * dy / y)`
    Proportional,
}

/// Preview of a deposit
///
/// `final_*` amounts are what the pool actually takes. The `refund_*`
/// difference to the requested amounts must be returned to (or never
/// collected from) the depositor by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityResult {
    pub lp_tokens_minted: u64,
    pub requested_input_amount: u64,
    pub requested_output_amount: u64,
    pub final_input_amount: u64,
    pub final_output_amount: u64,
    pub refund_input_amount: u64,
    pub refund_output_amount: u64,
    /// `lp / (prior supply + lp)`, in percent
    pub share_of_pool_pct: Decimal,
    /// LP supply after the mint, locked minimum included
    pub new_total_supply: u64,
    pub regime: LiquidityRegime,
}

/// Preview of a withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityResult {
    pub input_amount_out: u64,
    pub output_amount_out: u64,
    /// Burned share of the pre-withdrawal supply, in percent
    pub share_of_pool_pct: Decimal,
}

pub struct LiquidityCalculator;

impl LiquidityCalculator {
    /// Calculate the LP tokens minted for depositing `amount_in` / `amount_out`
    pub fn compute_add_liquidity(
        amount_in: u64,
        amount_out: u64,
        reserve_in: u64,
        reserve_out: u64,
        total_lp_supply: u64,
    ) -> Result<AddLiquidityResult> {
        ensure_positive(amount_in, "input deposit")?;
        ensure_positive(amount_out, "output deposit")?;

        if total_lp_supply == 0 || reserve_in == 0 || reserve_out == 0 {
            Self::bootstrap(amount_in, amount_out, total_lp_supply)
        } else {
            Self::proportional(amount_in, amount_out, reserve_in, reserve_out, total_lp_supply)
        }
    }

    /// Calculate the tokens returned for burning `lp_tokens`
    pub fn compute_remove_liquidity(
        lp_tokens: u64,
        reserve_in: u64,
        reserve_out: u64,
        total_lp_supply: u64,
    ) -> Result<RemoveLiquidityResult> {
        ensure_positive(lp_tokens, "lp tokens")?;
        ensure_reserves(reserve_in, reserve_out)?;
        if lp_tokens > total_lp_supply {
            return Err(AmmError::insufficient_liquidity(format!(
                "lp tokens {} exceed total supply {}",
                lp_tokens, total_lp_supply
            )));
        }

        let supply = u128::from(total_lp_supply);
        let input_amount_out = to_amount(
            mul_div_floor(lp_tokens, reserve_in, supply)?,
            "input withdrawal",
        )?;
        let output_amount_out = to_amount(
            mul_div_floor(lp_tokens, reserve_out, supply)?,
            "output withdrawal",
        )?;

        Ok(RemoveLiquidityResult {
            input_amount_out,
            output_amount_out,
            share_of_pool_pct: percent(lp_tokens, total_lp_supply)?,
        })
    }

    /// Any supply left over from a drained pool stays outstanding; the new
    /// shares and the locked minimum are added on top of it.
    fn bootstrap(
        amount_in: u64,
        amount_out: u64,
        total_lp_supply: u64,
    ) -> Result<AddLiquidityResult> {
        // sqrt of a u64 x u64 product always fits a u64
        let root = to_amount(
            isqrt(u128::from(amount_in) * u128::from(amount_out)),
            "initial liquidity",
        )?;
        if root <= MINIMUM_LIQUIDITY {
            return Err(AmmError::insufficient_liquidity(format!(
                "initial liquidity {} does not exceed the locked minimum {}",
                root, MINIMUM_LIQUIDITY
            )));
        }
        let lp_tokens_minted = root - MINIMUM_LIQUIDITY;
        let new_total_supply = total_lp_supply.checked_add(root).ok_or_else(|| {
            AmmError::invalid_input(format!(
                "supply {} plus initial liquidity {} exceeds the amount range",
                total_lp_supply, root
            ))
        })?;

        Ok(AddLiquidityResult {
            lp_tokens_minted,
            requested_input_amount: amount_in,
            requested_output_amount: amount_out,
            final_input_amount: amount_in,
            final_output_amount: amount_out,
            refund_input_amount: 0,
            refund_output_amount: 0,
            share_of_pool_pct: share_after_mint(lp_tokens_minted, total_lp_supply)?,
            new_total_supply,
            regime: LiquidityRegime::Bootstrap,
        })
    }

    fn proportional(
        amount_in: u64,
        amount_out: u64,
        reserve_in: u64,
        reserve_out: u64,
        total_lp_supply: u64,
    ) -> Result<AddLiquidityResult> {
        let lp_from_in = mul_div_floor(total_lp_supply, amount_in, u128::from(reserve_in))?;
        let lp_from_out = mul_div_floor(total_lp_supply, amount_out, u128::from(reserve_out))?;
        let lp_tokens_minted = to_amount(lp_from_in.min(lp_from_out), "lp tokens minted")?;
        if lp_tokens_minted == 0 {
            return Err(AmmError::insufficient_liquidity(format!(
                "deposit {}/{} is too small to mint against supply {}",
                amount_in, amount_out, total_lp_supply
            )));
        }

        let supply = u128::from(total_lp_supply);
        let final_input_amount = to_amount(
            mul_div_ceil(lp_tokens_minted, reserve_in, supply)?,
            "consumed input",
        )?;
        let final_output_amount = to_amount(
            mul_div_ceil(lp_tokens_minted, reserve_out, supply)?,
            "consumed output",
        )?;
        if final_input_amount > amount_in || final_output_amount > amount_out {
            return Err(AmmError::invariant_violation(format!(
                "consumed {}/{} exceeds deposit {}/{}",
                final_input_amount, final_output_amount, amount_in, amount_out
            )));
        }

        let new_total_supply = total_lp_supply.checked_add(lp_tokens_minted).ok_or_else(|| {
            AmmError::invalid_input(format!(
                "supply {} plus minted {} exceeds the amount range",
                total_lp_supply, lp_tokens_minted
            ))
        })?;

        Ok(AddLiquidityResult {
            lp_tokens_minted,
            requested_input_amount: amount_in,
            requested_output_amount: amount_out,
            final_input_amount,
            final_output_amount,
            refund_input_amount: amount_in - final_input_amount,
            refund_output_amount: amount_out - final_output_amount,
            share_of_pool_pct: share_after_mint(lp_tokens_minted, total_lp_supply)?,
            new_total_supply,
            regime: LiquidityRegime::Proportional,
        })
    }
}

/// `lp / (supply + lp)`; the locked minimum does not count against the depositor
fn share_after_mint(lp_tokens: u64, total_lp_supply: u64) -> Result<Decimal> {
    let lp = Decimal::from(lp_tokens);
    lp.checked_add(Decimal::from(total_lp_supply))
        .and_then(|holders| lp.checked_div(holders))
        .map(|fraction| fraction * dec!(100))
        .ok_or_else(|| AmmError::invalid_input("share of an empty pool"))
}
