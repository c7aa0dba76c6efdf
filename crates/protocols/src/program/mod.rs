//! The constant-product AMM program.
//!
//! Pool accounts are Anchor accounts: an 8-byte discriminator followed by
//! Borsh-encoded fields. Every other address a pool uses is a PDA derived from
//! the pool or its mints.

/// Address derivation.
pub mod pda;
/// Pool account layout.
pub mod pool_account;
