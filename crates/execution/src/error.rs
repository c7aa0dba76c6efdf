use cpamm_domain::DomainError;
use cpamm_protocols::LedgerError;
use thiserror::Error;

/// Failure of a cache, position or quote operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// The pool is not in the published collection.
    #[error("Pool {0} is not cached")]
    PoolNotFound(String),
    #[error("Invalid address {0}")]
    InvalidAddress(String),
    /// A first deposit sets the price, so both amounts must be given.
    #[error("Pool {0} is empty; both deposit amounts are required")]
    PairedAmountRequired(String),
}

impl CacheError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Ledger(e) if e.is_transient())
    }

    pub(crate) fn invalid_address(address: &str) -> Self {
        Self::InvalidAddress(address.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_network_failures_are_transient() {
        assert!(CacheError::from(LedgerError::Network("timeout".to_string())).is_transient());
        assert!(!CacheError::from(LedgerError::AccountNotFound("x".to_string())).is_transient());
        assert!(!CacheError::PoolNotFound("x".to_string()).is_transient());
        assert!(!CacheError::from(DomainError::ZeroAmount).is_transient());
    }
}
