//! # Outcome AMM - Constant-Product Pricing Engine
//!
//! ## Purpose
//!
//! Client-side preview and validation math for YES/NO outcome-token pools
//! priced by the constant-product rule `x * y = k`. Computes swap outputs and
//! required inputs, price impact, LP-share minting and withdrawals, and the
//! slippage bounds a ledger instruction is submitted with. The ledger's own
//! contract re-runs the same formulas and is the source of truth; every value
//! returned here is an advisory preview against a reserve snapshot.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Reserve snapshots (`reserve_yes`, `reserve_no`,
//!   `total_lp_supply`) fetched by the caller from chain or database
//! - **Output Destinations**: Ledger submitters (`min_amount_out`,
//!   `max_amount_in`, `min_lp_tokens`), display layers
//! - **Precision**: Native fixed-point units, 6 decimals for outcome tokens
//!   and 8 for the base asset; no floating point anywhere
//! - **Validation**: Invariant post-conditions on every swap, explicit
//!   rejection of uninitialized pools and out-of-range fees/tolerances
//!
//! ## Architecture Role
//!
//! ```text
//! reserve snapshot ──► SwapCalculator ──────┐
//!                  ├─► LiquidityCalculator ─┼─► SlippageGuard ──► ledger bounds
//!                  └─► InvariantValidator ◄─┘
//!                          PricingService (request/response facade)
//! ```
//!
//! ## Rounding Policy
//!
//! - Amounts paid out (swap output, minted LP, withdrawals) round down
//! - Amounts charged (required input, consumed deposit) round up
//! - The swap fee is rounded toward zero before the curve is applied
//!
//! ## Concurrency
//!
//! Every calculator is a set of pure functions over `Copy` inputs; the
//! service holds only immutable settings. All types are `Send + Sync`.

pub mod error;
pub mod invariant;
pub mod liquidity;
pub mod pool_traits;
pub mod precision;
pub mod service;
pub mod slippage;
pub mod swap;

pub use error::{AmmError, ErrorKind, Result};
pub use invariant::InvariantValidator;
pub use liquidity::{AddLiquidityResult, LiquidityCalculator, LiquidityRegime, RemoveLiquidityResult};
pub use pool_traits::{CpmmPool, Outcome, PoolSnapshot, SwapDirection};
pub use service::{
    AddLiquidityQuote, AddLiquidityRequest, ExactOutQuote, ExactOutQuoteRequest, PricingService,
    RemoveLiquidityQuote, RemoveLiquidityRequest, SwapQuote, SwapQuoteRequest,
};
pub use slippage::SlippageGuard;
pub use swap::{SwapCalculator, SwapResult};

/// Engine constants
pub use amm_config::liquidity::MINIMUM_LIQUIDITY;
pub use amm_config::pricing::{
    BPS_DENOMINATOR, DEFAULT_FEE_BPS, DEFAULT_SLIPPAGE_BPS, MAX_FEE_BPS, MAX_SLIPPAGE_BPS,
};
pub use amm_config::tokens::{BASE_ASSET_DECIMALS, MAX_DECIMALS, OUTCOME_TOKEN_DECIMALS};
pub use amm_config::EngineSettings;

/// Common types for display values
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
