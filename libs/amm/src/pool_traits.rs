//! Pool snapshot and unified pool interface for YES/NO outcome pools

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::precision::ratio;
use crate::swap::ensure_reserves;
use crate::{SwapCalculator, SwapResult, DEFAULT_FEE_BPS};

/// Outcome token of a binary market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Yes,
    No,
}

/// Direction of a swap between the two outcome tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Sell YES, buy NO
    YesToNo,
    /// Sell NO, buy YES
    NoToYes,
}

impl SwapDirection {
    pub fn sold(self) -> Outcome {
        match self {
            Self::YesToNo => Outcome::Yes,
            Self::NoToYes => Outcome::No,
        }
    }

    pub fn bought(self) -> Outcome {
        match self {
            Self::YesToNo => Outcome::No,
            Self::NoToYes => Outcome::Yes,
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Self::YesToNo => Self::NoToYes,
            Self::NoToYes => Self::YesToNo,
        }
    }
}

/// Reserves and LP supply of a pool as of a recent snapshot
///
/// Supplied by the caller; the engine never refreshes or persists it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub reserve_yes: u64,
    pub reserve_no: u64,
    pub total_lp_supply: u64,
    #[serde(default = "default_fee_bps")]
    pub fee_bps: u32,
}

fn default_fee_bps() -> u32 {
    DEFAULT_FEE_BPS
}

impl PoolSnapshot {
    pub fn new(reserve_yes: u64, reserve_no: u64, total_lp_supply: u64) -> Self {
        Self {
            reserve_yes,
            reserve_no,
            total_lp_supply,
            fee_bps: DEFAULT_FEE_BPS,
        }
    }

    pub fn with_fee_bps(mut self, fee_bps: u32) -> Self {
        self.fee_bps = fee_bps;
        self
    }

    pub fn reserve(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Yes => self.reserve_yes,
            Outcome::No => self.reserve_no,
        }
    }

    /// True once both reserves and the LP supply are non-zero
    pub fn is_initialized(&self) -> bool {
        self.reserve_yes > 0 && self.reserve_no > 0 && self.total_lp_supply > 0
    }

    /// Snapshot as it would look after `result` settled
    pub fn after_swap(&self, direction: SwapDirection, result: &SwapResult) -> Self {
        let mut next = *self;
        match direction {
            SwapDirection::YesToNo => {
                next.reserve_yes = result.new_reserve_in;
                next.reserve_no = result.new_reserve_out;
            }
            SwapDirection::NoToYes => {
                next.reserve_no = result.new_reserve_in;
                next.reserve_yes = result.new_reserve_out;
            }
        }
        next
    }
}

/// Unified pool interface for quoting
pub trait CpmmPool {
    /// `(reserve_in, reserve_out)` oriented for `direction`
    fn reserves(&self, direction: SwapDirection) -> (u64, u64);

    /// Get fee tier
    fn fee_bps(&self) -> u32;

    /// Calculate the swap preview for a given input
    fn swap_output(&self, direction: SwapDirection, amount_in: u64) -> Result<SwapResult> {
        let (reserve_in, reserve_out) = self.reserves(direction);
        SwapCalculator::compute_swap_output(amount_in, reserve_in, reserve_out, self.fee_bps())
    }

    /// Calculate required input for desired output
    fn swap_input(&self, direction: SwapDirection, amount_out: u64) -> Result<u64> {
        let (reserve_in, reserve_out) = self.reserves(direction);
        SwapCalculator::compute_swap_input(amount_out, reserve_in, reserve_out, self.fee_bps())
    }

    /// Units of the bought token per unit of the sold token, before fees
    fn spot_price(&self, direction: SwapDirection) -> Result<Decimal> {
        let (reserve_in, reserve_out) = self.reserves(direction);
        ensure_reserves(reserve_in, reserve_out)?;
        ratio(reserve_out, reserve_in)
    }
}

impl CpmmPool for PoolSnapshot {
    fn reserves(&self, direction: SwapDirection) -> (u64, u64) {
        (
            self.reserve(direction.sold()),
            self.reserve(direction.bought()),
        )
    }

    fn fee_bps(&self) -> u32 {
        self.fee_bps
    }
}
