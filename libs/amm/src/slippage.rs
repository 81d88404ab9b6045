//! Slippage bounds for ledger submission
//!
//! Quotes are computed against a reserve snapshot that may move before the
//! transaction lands. The bounds derived here are what the ledger re-checks
//! atomically at settlement.

use crate::error::{AmmError, Result};
use crate::precision::{div_ceil, to_amount};
use crate::{BPS_DENOMINATOR, MAX_SLIPPAGE_BPS};

pub struct SlippageGuard;

impl SlippageGuard {
    /// Reject tolerances above [`MAX_SLIPPAGE_BPS`]; never clamps
    pub fn validate_tolerance(tolerance_bps: u32) -> Result<()> {
        if tolerance_bps > MAX_SLIPPAGE_BPS {
            return Err(AmmError::invalid_input(format!(
                "slippage tolerance {} bps exceeds maximum {} bps",
                tolerance_bps, MAX_SLIPPAGE_BPS
            )));
        }
        Ok(())
    }

    /// `ceil(expected_output * (1 - tolerance))`
    ///
    /// Rounded up so the bound itself always passes [`Self::is_within_slippage`].
    pub fn min_output_for_tolerance(expected_output: u64, tolerance_bps: u32) -> Result<u64> {
        Self::validate_tolerance(tolerance_bps)?;
        let keep = u128::from(BPS_DENOMINATOR - tolerance_bps);
        // result <= expected_output, narrowing cannot fail
        to_amount(
            div_ceil(
                u128::from(expected_output) * keep,
                u128::from(BPS_DENOMINATOR),
            ),
            "minimum output",
        )
    }

    /// True if `candidate_min_output >= expected_output * (1 - tolerance)`
    ///
    /// Compared exactly, without rounding the bound.
    pub fn is_within_slippage(
        expected_output: u64,
        candidate_min_output: u64,
        tolerance_bps: u32,
    ) -> Result<bool> {
        Self::validate_tolerance(tolerance_bps)?;
        let candidate = u128::from(candidate_min_output) * u128::from(BPS_DENOMINATOR);
        let bound = u128::from(expected_output) * u128::from(BPS_DENOMINATOR - tolerance_bps);
        Ok(candidate >= bound)
    }

    /// `ceil(expected_input * (1 + tolerance))`, the bound for exact-output swaps
    pub fn max_input_for_tolerance(expected_input: u64, tolerance_bps: u32) -> Result<u64> {
        Self::validate_tolerance(tolerance_bps)?;
        let grow = u128::from(BPS_DENOMINATOR + tolerance_bps);
        to_amount(
            div_ceil(
                u128::from(expected_input) * grow,
                u128::from(BPS_DENOMINATOR),
            ),
            "maximum input",
        )
    }
}
