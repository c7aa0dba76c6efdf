//! Program-derived addresses and pool creation checks.

use cpamm_domain::DomainError;
use solana_sdk::pubkey::Pubkey;

/// SPL token program.
pub const TOKEN_PROGRAM_ID: Pubkey = spl_token::ID;

/// Associated token account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Highest fee a pool may be created with (1%).
pub const MAX_CREATION_FEE_BPS: u16 = 100;

const POOL_SEED: &[u8] = b"pool";
const LP_MINT_SEED: &[u8] = b"lp_mint";
const RESERVE_A_SEED: &[u8] = b"reserve_a";
const RESERVE_B_SEED: &[u8] = b"reserve_b";
const AUTHORITY_SEED: &[u8] = b"authority";

/// Every address owned by one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolAddresses {
    pub pool: Pubkey,
    pub bump: u8,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub lp_mint: Pubkey,
    pub reserve_a: Pubkey,
    pub reserve_b: Pubkey,
    pub authority: Pubkey,
}

/// Orders two mints byte-wise ascending, the order pools are keyed by.
pub fn canonical_mint_order(x: Pubkey, y: Pubkey) -> (Pubkey, Pubkey) {
    if x.to_bytes() <= y.to_bytes() {
        (x, y)
    } else {
        (y, x)
    }
}

/// Derives the pool PDA and every address hanging off it for a mint pair.
///
/// The mints may be given in either order.
pub fn derive_pool_addresses(program_id: &Pubkey, x: Pubkey, y: Pubkey) -> PoolAddresses {
    let (mint_a, mint_b) = canonical_mint_order(x, y);
    let (pool, bump) = Pubkey::find_program_address(
        &[POOL_SEED, mint_a.as_ref(), mint_b.as_ref()],
        program_id,
    );
    let derive = |seed: &[u8]| Pubkey::find_program_address(&[seed, pool.as_ref()], program_id).0;

    PoolAddresses {
        pool,
        bump,
        mint_a,
        mint_b,
        lp_mint: derive(LP_MINT_SEED),
        reserve_a: derive(RESERVE_A_SEED),
        reserve_b: derive(RESERVE_B_SEED),
        authority: derive(AUTHORITY_SEED),
    }
}

/// Associated token account of `owner` for `mint` under the SPL token program.
pub fn derive_associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    let (ata, _bump) = Pubkey::find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    );
    ata
}

/// Checks the arguments of a pool creation.
///
/// # Errors
/// [`DomainError::InvalidPair`] for identical mints and
/// [`DomainError::InvalidFee`] above [`MAX_CREATION_FEE_BPS`].
pub fn validate_pool_creation(
    mint_a: &Pubkey,
    mint_b: &Pubkey,
    fee_bps: u16,
) -> Result<(), DomainError> {
    if mint_a == mint_b {
        return Err(DomainError::invalid_pair(
            mint_a.to_string(),
            mint_b.to_string(),
            "identical mints",
        ));
    }
    if fee_bps > MAX_CREATION_FEE_BPS {
        return Err(DomainError::InvalidFee(u32::from(fee_bps)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let low = Pubkey::new_from_array([1; 32]);
        let high = Pubkey::new_from_array([9; 32]);
        assert_eq!(canonical_mint_order(high, low), (low, high));
        assert_eq!(canonical_mint_order(low, high), (low, high));
    }

    #[test]
    fn test_pool_address_ignores_mint_order() {
        let program_id = Pubkey::new_unique();
        let x = Pubkey::new_unique();
        let y = Pubkey::new_unique();

        let forward = derive_pool_addresses(&program_id, x, y);
        let reverse = derive_pool_addresses(&program_id, y, x);
        assert_eq!(forward, reverse);
        assert_ne!(forward.lp_mint, forward.reserve_a);
        assert_ne!(forward.reserve_a, forward.reserve_b);
    }

    #[test]
    fn test_associated_token_address_is_deterministic() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        assert_eq!(
            derive_associated_token_address(&owner, &mint),
            derive_associated_token_address(&owner, &mint)
        );
        assert_ne!(
            derive_associated_token_address(&owner, &mint),
            derive_associated_token_address(&mint, &owner)
        );
    }

    #[test]
    fn test_validate_pool_creation() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        assert!(validate_pool_creation(&a, &b, 0).is_ok());
        assert!(validate_pool_creation(&a, &b, 100).is_ok());
        assert_eq!(
            validate_pool_creation(&a, &b, 101),
            Err(DomainError::InvalidFee(101))
        );
        assert!(validate_pool_creation(&a, &a, 30).is_err());
    }
}
