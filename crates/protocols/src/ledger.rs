//! The seam between the cache and the chain.

use crate::error::LedgerError;
use crate::program::pool_account::{POOL_ACCOUNT_LEN, PoolRecord};
use crate::rpc::RpcProvider;
use crate::token::{MintInfo, TokenAccountInfo};
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, warn};

/// Read-only access to the accounts the AMM is built from.
///
/// Implementations must distinguish [`LedgerError::AccountNotFound`] from
/// [`LedgerError::Network`]; callers treat the first as a semantic zero.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Every pool the program owns.
    async fn pool_records(&self) -> Result<Vec<PoolRecord>, LedgerError>;

    /// One pool by address.
    async fn pool_record(&self, address: &Pubkey) -> Result<PoolRecord, LedgerError>;

    /// Decimals and supply of a mint.
    async fn mint(&self, address: &Pubkey) -> Result<MintInfo, LedgerError>;

    /// Owner, mint and balance of a token account.
    async fn token_account(&self, address: &Pubkey) -> Result<TokenAccountInfo, LedgerError>;
}

/// [`LedgerReader`] over JSON-RPC.
pub struct SolanaLedger {
    provider: Arc<RpcProvider>,
    program_id: Pubkey,
}

impl SolanaLedger {
    pub fn new(provider: Arc<RpcProvider>, program_id: Pubkey) -> Self {
        Self {
            provider,
            program_id,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    async fn required_account(
        &self,
        address: &Pubkey,
    ) -> Result<solana_sdk::account::Account, LedgerError> {
        self.provider
            .get_account(address)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(address.to_string()))
    }
}

#[async_trait]
impl LedgerReader for SolanaLedger {
    async fn pool_records(&self) -> Result<Vec<PoolRecord>, LedgerError> {
        let accounts = self
            .provider
            .get_program_accounts_sized(&self.program_id, POOL_ACCOUNT_LEN)
            .await?;
        debug!(count = accounts.len(), "Fetched pool accounts");

        let records = accounts
            .into_iter()
            .filter_map(
                |(address, account)| match PoolRecord::from_account_data(address, &account.data) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(pool = %address, error = %e, "Skipping undecodable pool account");
                        None
                    }
                },
            )
            .collect();
        Ok(records)
    }

    async fn pool_record(&self, address: &Pubkey) -> Result<PoolRecord, LedgerError> {
        let account = self.required_account(address).await?;
        if account.owner != self.program_id {
            return Err(LedgerError::invalid_data(
                address,
                "account is not owned by the AMM program",
            ));
        }
        PoolRecord::from_account_data(*address, &account.data)
    }

    async fn mint(&self, address: &Pubkey) -> Result<MintInfo, LedgerError> {
        let account = self.required_account(address).await?;
        MintInfo::from_account(*address, &account)
    }

    async fn token_account(&self, address: &Pubkey) -> Result<TokenAccountInfo, LedgerError> {
        let account = self.required_account(address).await?;
        TokenAccountInfo::from_account(*address, &account)
    }
}
