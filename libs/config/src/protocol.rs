//! Pricing and liquidity constants
//!
//! Every amount these constants apply to is expressed in the token's
//! smallest unit; fees and tolerances are basis points.

/// Basis point and fee constants
pub mod pricing {
    /// One whole in basis points (100%)
    pub const BPS_DENOMINATOR: u32 = 10_000;

    /// Default swap fee (0.3%)
    pub const DEFAULT_FEE_BPS: u32 = 30;

    /// Highest fee a pool may charge (100%)
    pub const MAX_FEE_BPS: u32 = BPS_DENOMINATOR;

    /// Default slippage tolerance applied to quotes (0.5%)
    pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;

    /// Slippage tolerance cap (50%); larger values are rejected, not clamped
    pub const MAX_SLIPPAGE_BPS: u32 = 5_000;
}

/// Liquidity pool constants
pub mod liquidity {
    /// LP units withheld from the bootstrap mint so a pool can never be
    /// drained back to a zero-reserve state
    pub const MINIMUM_LIQUIDITY: u64 = 1_000;
}

/// Token precision (decimal exponents)
pub mod tokens {
    /// YES / NO outcome tokens
    pub const OUTCOME_TOKEN_DECIMALS: u8 = 6;

    /// Base collateral asset
    pub const BASE_ASSET_DECIMALS: u8 = 8;

    /// Largest exponent that still fits a `u64` scale factor
    pub const MAX_DECIMALS: u8 = 19;
}
