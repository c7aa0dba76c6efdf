//! Long-lived RPC provider.
//!
//! One [`RpcProvider`] is built per process and shared behind an `Arc`. It owns
//! the only `RpcClient`, so connection reuse and the request timeout are set
//! in one place.

use crate::error::LedgerError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcProgramAccountsConfig;
use solana_client::rpc_filter::RpcFilterType;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::account::Account;
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;
use tracing::{debug, info};

/// Public devnet endpoint.
pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";

/// Configuration for the RPC provider.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// JSON-RPC endpoint.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Commitment used for every read.
    pub commitment: CommitmentConfig,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEVNET_RPC_URL.to_string(),
            timeout_secs: 30,
            commitment: CommitmentConfig::confirmed(),
        }
    }
}

impl RpcConfig {
    /// Default configuration pointed at `url`.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Shared, non-blocking RPC client.
pub struct RpcProvider {
    client: RpcClient,
    config: RpcConfig,
}

impl RpcProvider {
    /// Creates a provider. No request is made until the first read.
    pub fn new(config: RpcConfig) -> Self {
        info!(url = %config.url, timeout_secs = config.timeout_secs, "Creating RPC provider");
        let client = RpcClient::new_with_timeout_and_commitment(
            config.url.clone(),
            Duration::from_secs(config.timeout_secs),
            config.commitment,
        );
        Self { client, config }
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Reads one account. `Ok(None)` means the account does not exist.
    pub async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, LedgerError> {
        debug!(address = %address, "Fetching account");
        let response = self
            .client
            .get_account_with_commitment(address, self.config.commitment)
            .await?;
        Ok(response.value)
    }

    /// Lists every account owned by `program_id` whose data is exactly `data_len` bytes.
    pub async fn get_program_accounts_sized(
        &self,
        program_id: &Pubkey,
        data_len: usize,
    ) -> Result<Vec<(Pubkey, Account)>, LedgerError> {
        debug!(program = %program_id, data_len, "Fetching program accounts");
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::DataSize(data_len as u64)]),
            ..RpcProgramAccountsConfig::default()
        };
        let accounts = self
            .client
            .get_program_accounts_with_config(program_id, config)
            .await?;
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RpcConfig::default();
        assert_eq!(config.url, DEVNET_RPC_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.commitment, CommitmentConfig::confirmed());
    }

    #[test]
    fn test_with_url() {
        let config = RpcConfig::with_url("http://localhost:8899");
        assert_eq!(config.url, "http://localhost:8899");
        assert_eq!(config.timeout_secs, 30);
    }

    #[tokio::test]
    async fn test_provider_construction_is_lazy() {
        let provider = RpcProvider::new(RpcConfig::with_url("http://127.0.0.1:1"));
        assert_eq!(provider.config().url, "http://127.0.0.1:1");
    }
}
