//! Errors raised by quote assembly and domain validation.
//!
//! The numeric kernels in [`crate::math`] never fail; they return zero or
//! `None` at their boundaries. These errors surface one level up, where a
//! caller asked for something the pool cannot provide.

use thiserror::Error;

/// Domain-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The two mints are identical, or no pool connects them.
    #[error("Invalid pair {mint_x}/{mint_y}: {reason}")]
    InvalidPair {
        /// First mint of the requested pair.
        mint_x: String,
        /// Second mint of the requested pair.
        mint_y: String,
        /// Why the pair was rejected.
        reason: &'static str,
    },
    /// The pool cannot supply the requested amount.
    #[error("Insufficient liquidity in pool {pool}")]
    InsufficientLiquidity {
        /// Pool address.
        pool: String,
    },
    /// The mint is not one of the pool's two tokens.
    #[error("Mint {mint} is not traded by pool {pool}")]
    TokenNotInPool {
        /// Pool address.
        pool: String,
        /// Offending mint.
        mint: String,
    },
    /// The pool's LP supply has not been loaded.
    #[error("LP supply for pool {pool} is not loaded")]
    LpSupplyUnavailable {
        /// Pool address.
        pool: String,
    },
    /// Amounts must be strictly positive.
    #[error("Amount must be greater than zero")]
    ZeroAmount,
    /// A human amount does not fit the token's raw integer range.
    #[error("Amount {amount} is out of range for {decimals} decimals")]
    AmountOutOfRange {
        /// Amount as entered.
        amount: String,
        /// Token decimals.
        decimals: u8,
    },
    /// Fee rate outside `[0, 10000)` basis points.
    #[error("Fee rate {0} bps is outside [0, 10000)")]
    InvalidFee(u32),
    /// Slippage tolerance above 100%.
    #[error("Slippage tolerance {0} bps exceeds 100%")]
    InvalidTolerance(u32),
}

impl DomainError {
    /// Builds an [`DomainError::InvalidPair`].
    pub fn invalid_pair(
        mint_x: impl Into<String>,
        mint_y: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidPair {
            mint_x: mint_x.into(),
            mint_y: mint_y.into(),
            reason,
        }
    }

    /// Builds an [`DomainError::InsufficientLiquidity`].
    pub fn insufficient_liquidity(pool: impl Into<String>) -> Self {
        Self::InsufficientLiquidity { pool: pool.into() }
    }
}
