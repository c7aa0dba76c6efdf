//! Enumerates a wallet's LP holdings across cached pools.

use crate::cache::{PoolSet, parse_address};
use crate::error::CacheError;
use cpamm_domain::entities::{PoolSnapshot, UserPosition};
use cpamm_domain::value_objects::Amount;
use cpamm_protocols::LedgerError;
use cpamm_protocols::ledger::LedgerReader;
use cpamm_protocols::program::pda::derive_associated_token_address;
use futures::future::try_join_all;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, info};

/// Looks up LP balances for pools already in the cache.
pub struct PositionTracker {
    ledger: Arc<dyn LedgerReader>,
}

impl PositionTracker {
    pub fn new(ledger: Arc<dyn LedgerReader>) -> Self {
        Self { ledger }
    }

    /// Every pool in `pools` where `owner` holds LP tokens, in pool address order.
    ///
    /// A missing LP account or a zero balance is simply not a position.
    ///
    /// # Errors
    /// The first network error aborts the listing.
    pub async fn enumerate(
        &self,
        pools: &PoolSet,
        owner: &Pubkey,
    ) -> Result<Vec<UserPosition>, CacheError> {
        let positions = try_join_all(pools.iter().map(|pool| self.position_in(pool, owner)))
            .await?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        info!(owner = %owner, positions = positions.len(), "Enumerated LP positions");
        Ok(positions)
    }

    /// The position of `owner` in one cached pool, if any.
    pub async fn find(
        &self,
        pools: &PoolSet,
        owner: &Pubkey,
        pool_address: &str,
    ) -> Result<Option<UserPosition>, CacheError> {
        let pool = pools
            .get(pool_address)
            .ok_or_else(|| CacheError::PoolNotFound(pool_address.to_string()))?;
        self.position_in(pool, owner).await
    }

    async fn position_in(
        &self,
        pool: &PoolSnapshot,
        owner: &Pubkey,
    ) -> Result<Option<UserPosition>, CacheError> {
        let lp_mint = parse_address(&pool.lp_mint)?;
        let lp_account = derive_associated_token_address(owner, &lp_mint);

        let balance = match self.ledger.token_account(&lp_account).await {
            Ok(account) => account.amount,
            Err(LedgerError::AccountNotFound(_)) => {
                debug!(pool = %pool.address, "No LP account");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        if balance == 0 {
            return Ok(None);
        }

        let supply = match pool.lp_supply {
            Some(supply) => supply,
            None => {
                let mint = self.ledger.mint(&lp_mint).await?;
                Amount::from_raw(mint.supply, mint.decimals)
            }
        };

        Ok(UserPosition::from_pool(
            pool,
            owner.to_string(),
            Amount::from_raw(balance, supply.decimals),
            supply,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, PoolStateCache};
    use crate::testing::MockLedger;
    use cpamm_protocols::token_registry::StaticTokenRegistry;
    use rust_decimal_macros::dec;

    async fn setup(ledger: MockLedger) -> (Arc<PoolSet>, PositionTracker) {
        let ledger: Arc<dyn LedgerReader> = Arc::new(ledger);
        let cache = PoolStateCache::new(
            Arc::clone(&ledger),
            Arc::new(StaticTokenRegistry::empty()),
            CacheConfig::default(),
        );
        cache.refresh().await.unwrap();
        (cache.snapshot().await, PositionTracker::new(ledger))
    }

    #[tokio::test]
    async fn test_enumerate_skips_empty_and_missing() {
        let owner = Pubkey::new_unique();
        let mut ledger = MockLedger::new();
        let held = ledger.add_pool(1_000, 2_000, 30);
        let emptied = ledger.add_pool(1_000, 2_000, 30);
        ledger.add_pool(1_000, 2_000, 30);
        ledger.add_lp_holding(&held, &owner, 250_000);
        ledger.add_lp_holding(&emptied, &owner, 0);

        let (pools, tracker) = setup(ledger).await;
        let positions = tracker.enumerate(&pools, &owner).await.unwrap();

        assert_eq!(positions.len(), 1);
        let position = &positions[0];
        assert_eq!(position.pool_address, held.address.to_string());
        assert_eq!(position.lp_balance.as_u64(), 250_000);
        assert_eq!(position.share_of_pool, dec!(25));
    }

    #[tokio::test]
    async fn test_enumerate_orders_by_pool_address() {
        let owner = Pubkey::new_unique();
        let mut ledger = MockLedger::new();
        for _ in 0..4 {
            let pool = ledger.add_pool(1_000, 1_000, 30);
            ledger.add_lp_holding(&pool, &owner, 10);
        }

        let (pools, tracker) = setup(ledger).await;
        let positions = tracker.enumerate(&pools, &owner).await.unwrap();
        let addresses: Vec<&String> = positions.iter().map(|p| &p.pool_address).collect();
        let mut sorted = addresses.clone();
        sorted.sort();
        assert_eq!(positions.len(), 4);
        assert_eq!(addresses, sorted);
    }

    #[tokio::test]
    async fn test_network_error_surfaces() {
        let owner = Pubkey::new_unique();
        let mut ledger = MockLedger::new();
        let pool = ledger.add_pool(1_000, 2_000, 30);
        let ata = ledger.add_lp_holding(&pool, &owner, 10);
        ledger.fail_account(ata);

        let (pools, tracker) = setup(ledger).await;
        assert!(matches!(
            tracker.enumerate(&pools, &owner).await,
            Err(CacheError::Ledger(LedgerError::Network(_)))
        ));
    }

    #[tokio::test]
    async fn test_find_single_pool() {
        let owner = Pubkey::new_unique();
        let mut ledger = MockLedger::new();
        let pool = ledger.add_pool(1_000, 2_000, 30);
        ledger.add_lp_holding(&pool, &owner, 500_000);

        let (pools, tracker) = setup(ledger).await;
        let position = tracker
            .find(&pools, &owner, &pool.address.to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(position.share_of_pool, dec!(50));

        let stranger = Pubkey::new_unique();
        assert!(
            tracker
                .find(&pools, &stranger, &pool.address.to_string())
                .await
                .unwrap()
                .is_none()
        );
    }
}
