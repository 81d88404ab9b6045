//! # Outcome AMM Configuration
//!
//! Constants and runtime settings for the outcome-token CPMM pricing engine.
//!
//! ## Features
//!
//! - **Pricing Constants**: Fee defaults, basis-point denominator, slippage cap
//! - **Liquidity Constants**: Permanently locked minimum liquidity
//! - **Token Precision**: Decimal exponents for outcome tokens and the base asset
//! - **Engine Settings**: TOML + environment loading with validation
//!
//! ## Usage
//!
//! ```rust
//! use amm_config::{pricing, EngineSettings};
//!
//! let settings = EngineSettings::default();
//! assert_eq!(settings.fee_bps, pricing::DEFAULT_FEE_BPS);
//! assert!(settings.validate().is_ok());
//! ```

pub mod engine_settings;
pub mod protocol;

// Re-export commonly used types
pub use engine_settings::{load_settings, EngineSettings};
pub use protocol::*;
