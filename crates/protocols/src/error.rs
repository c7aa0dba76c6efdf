use thiserror::Error;

/// Failure reading from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Transport or RPC failure. Transient.
    #[error("Network error: {0}")]
    Network(String),
    /// The account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    /// The account exists but its data does not decode.
    #[error("Invalid account data for {address}: {reason}")]
    InvalidAccountData {
        /// Account address.
        address: String,
        /// Decoder message.
        reason: String,
    },
    /// A string is not a valid base58 address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// Token list could not be loaded.
    #[error("Token registry error: {0}")]
    Registry(String),
}

impl LedgerError {
    /// Whether a later retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub(crate) fn invalid_data(address: impl ToString, reason: impl ToString) -> Self {
        Self::InvalidAccountData {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<solana_client::client_error::ClientError> for LedgerError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        Self::Network(err.to_string())
    }
}
