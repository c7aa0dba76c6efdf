//! Ledger access for the constant-product AMM.
//!
//! This crate talks to the chain and to nothing else:
//! - A long-lived RPC provider
//! - The [`LedgerReader`] seam the cache reads through
//! - The AMM program's pool account layout and address derivation
//! - SPL mint and token account decoding
//! - Token metadata registries

/// Error types.
pub mod error;
/// Ledger reader trait and its RPC-backed implementation.
pub mod ledger;
/// Prelude module for convenient imports.
pub mod prelude;
/// AMM program accounts and addresses.
pub mod program;
/// RPC provider.
pub mod rpc;
/// SPL token account decoding.
pub mod token;
/// Token metadata lookup.
pub mod token_registry;

pub use error::LedgerError;
pub use ledger::{LedgerReader, SolanaLedger};
