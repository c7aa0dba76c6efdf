//! Finds the pool that trades a pair directly.

use crate::entities::pool::PoolSnapshot;
use crate::entities::token::Token;
use crate::error::DomainError;
use std::collections::BTreeMap;

/// Returns the first pool trading `mint_x` against `mint_y`, in either order.
///
/// The scan follows the iteration order of `pools`; callers pass a collection
/// keyed by pool address so the answer is deterministic.
pub fn find_direct_pool<'a, I>(pools: I, mint_x: &str, mint_y: &str) -> Option<&'a PoolSnapshot>
where
    I: IntoIterator<Item = &'a PoolSnapshot>,
{
    pools.into_iter().find(|pool| pool.connects(mint_x, mint_y))
}

/// Like [`find_direct_pool`], but explains why no pool was returned.
///
/// # Errors
/// [`DomainError::InvalidPair`] when the mints are identical or no pool connects them.
pub fn resolve_pair<'a, I>(
    pools: I,
    mint_x: &str,
    mint_y: &str,
) -> Result<&'a PoolSnapshot, DomainError>
where
    I: IntoIterator<Item = &'a PoolSnapshot>,
{
    if mint_x == mint_y {
        return Err(DomainError::invalid_pair(mint_x, mint_y, "identical mints"));
    }
    find_direct_pool(pools, mint_x, mint_y)
        .ok_or_else(|| DomainError::invalid_pair(mint_x, mint_y, "no direct pool"))
}

/// Distinct tokens across `pools`, ordered by mint.
pub fn token_catalog<'a, I>(pools: I) -> Vec<Token>
where
    I: IntoIterator<Item = &'a PoolSnapshot>,
{
    let mut tokens: BTreeMap<&str, &Token> = BTreeMap::new();
    for pool in pools {
        for token in [&pool.token_a, &pool.token_b] {
            tokens.entry(token.mint_address.as_str()).or_insert(token);
        }
    }
    tokens.into_values().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::pool::fixtures::{BONK, SOL, USDC, pool};

    fn pools() -> Vec<PoolSnapshot> {
        vec![
            pool("pool-1", SOL, USDC, 1, 1),
            pool("pool-2", BONK, SOL, 1, 1),
            pool("pool-3", USDC, SOL, 1, 1),
        ]
    }

    #[test]
    fn test_find_direct_pool_is_symmetric() {
        let pools = pools();
        let forward = find_direct_pool(&pools, SOL, BONK).unwrap();
        let reverse = find_direct_pool(&pools, BONK, SOL).unwrap();
        assert_eq!(forward.address, "pool-2");
        assert_eq!(forward.address, reverse.address);
    }

    #[test]
    fn test_first_match_wins() {
        let pools = pools();
        assert_eq!(find_direct_pool(&pools, USDC, SOL).unwrap().address, "pool-1");
    }

    #[test]
    fn test_no_multi_hop() {
        let pools = pools();
        assert!(find_direct_pool(&pools, USDC, BONK).is_none());
        assert!(matches!(
            resolve_pair(&pools, USDC, BONK),
            Err(DomainError::InvalidPair { reason: "no direct pool", .. })
        ));
    }

    #[test]
    fn test_identical_mints_rejected() {
        let pools = pools();
        assert!(matches!(
            resolve_pair(&pools, SOL, SOL),
            Err(DomainError::InvalidPair { reason: "identical mints", .. })
        ));
    }

    #[test]
    fn test_token_catalog_dedupes() {
        let catalog = token_catalog(&pools());
        let mints: Vec<&str> = catalog.iter().map(|t| t.mint_address.as_str()).collect();
        let mut expected = vec![SOL, USDC, BONK];
        expected.sort();
        assert_eq!(mints, expected);
    }
}
