//! Live state for the constant-product AMM quote companion.
//!
//! This crate keeps a mirror of on-chain pools and answers questions from it:
//! - Pool state cache with per-pool failure isolation
//! - Periodic refresh scheduling
//! - LP position enumeration for a wallet
//! - A quote service joining the cache with the domain math

/// Prelude module for convenient imports.
pub mod prelude;

/// Pool state cache.
pub mod cache;
/// Error types.
pub mod error;
/// LP position tracking.
pub mod positions;
/// Quote facade.
pub mod quote_service;
/// Refresh scheduling.
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use error::CacheError;
