//! Pricing engine errors
//!
//! Every failure is a local, synchronous validation result; nothing is
//! retryable because the engine performs no I/O. Callers translate these into
//! user-facing messages and decide whether to re-fetch reserves.

use thiserror::Error;

/// Coarse classification of an [`AmmError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    InsufficientLiquidity,
    InvariantViolation,
}

/// Errors raised by the swap, liquidity, invariant and slippage calculators
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    /// Non-positive amount or reserve, fee or tolerance out of range, or a
    /// result that does not fit the amount type
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Requested output at or beyond the reserve, deposit below the locked
    /// minimum, or LP burn above the outstanding supply
    #[error("Insufficient liquidity: {reason}")]
    InsufficientLiquidity { reason: String },

    /// Post-condition failure; indicates a calculation bug, never bad input
    #[error("Invariant violation: {reason}")]
    InvariantViolation { reason: String },
}

impl AmmError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn insufficient_liquidity(reason: impl Into<String>) -> Self {
        Self::InsufficientLiquidity {
            reason: reason.into(),
        }
    }

    pub fn invariant_violation(reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::InsufficientLiquidity { .. } => ErrorKind::InsufficientLiquidity,
            Self::InvariantViolation { .. } => ErrorKind::InvariantViolation,
        }
    }

    /// True for bugs that must not be shown to the user as a bad request
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::InvariantViolation
    }
}

pub type Result<T> = std::result::Result<T, AmmError>;
