//! Prelude module for convenient imports.

pub use crate::error::LedgerError;
pub use crate::ledger::{LedgerReader, SolanaLedger};
pub use crate::program::pda::{
    PoolAddresses, canonical_mint_order, derive_associated_token_address, derive_pool_addresses,
};
pub use crate::program::pool_account::{POOL_ACCOUNT_LEN, PoolAccount, PoolRecord};
pub use crate::rpc::{RpcConfig, RpcProvider};
pub use crate::token::{MintInfo, TokenAccountInfo};
pub use crate::token_registry::{StaticTokenRegistry, TokenMetadata, TokenRegistry};
