//! `k = x * y` invariant checks
//!
//! Only swaps are checked against the non-decreasing predicate. Liquidity
//! deposits and withdrawals move `k` proportionally by design.

use tracing::error;

use crate::error::{AmmError, Result};

pub struct InvariantValidator;

impl InvariantValidator {
    /// `k = reserve_a * reserve_b`, exact in `u128`
    #[inline]
    pub fn invariant(reserve_a: u64, reserve_b: u64) -> u128 {
        u128::from(reserve_a) * u128::from(reserve_b)
    }

    /// `new_a * new_b >= old_a * old_b`
    #[inline]
    pub fn verify_invariant_non_decreasing(old_a: u64, old_b: u64, new_a: u64, new_b: u64) -> bool {
        Self::invariant(new_a, new_b) >= Self::invariant(old_a, old_b)
    }

    /// Post-condition form of [`Self::verify_invariant_non_decreasing`]
    pub fn ensure_non_decreasing(old_a: u64, old_b: u64, new_a: u64, new_b: u64) -> Result<()> {
        if Self::verify_invariant_non_decreasing(old_a, old_b, new_a, new_b) {
            return Ok(());
        }

        let k_before = Self::invariant(old_a, old_b);
        let k_after = Self::invariant(new_a, new_b);
        error!(
            k_before = %k_before,
            k_after = %k_after,
            "constant-product invariant decreased"
        );
        Err(AmmError::invariant_violation(format!(
            "k decreased from {} to {} (reserves {}/{} -> {}/{})",
            k_before, k_after, old_a, old_b, new_a, new_b
        )))
    }
}
