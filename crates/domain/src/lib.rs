//! Domain model for the constant-product AMM quote companion.
//!
//! This crate holds everything that can be computed without touching the ledger:
//! - Token, pool snapshot and LP position entities
//! - Value objects for raw/human amounts, prices and slippage tolerances
//! - The constant-product quote engine
//! - Slippage bounds for swaps, deposits and withdrawals
//! - Direct pool resolution for a token pair

/// Prelude module for convenient imports.
pub mod prelude;

/// Core entities.
pub mod entities;
/// Domain errors.
pub mod error;
/// Pricing math.
pub mod math;
/// Transaction parameter shapes handed to a submitter.
pub mod params;
/// Swap and liquidity quotes.
pub mod quote;
/// Pair to pool resolution.
pub mod resolver;
/// Slippage bounds.
pub mod slippage;
/// Value objects.
pub mod value_objects;

pub use error::DomainError;
