use crate::error::LedgerError;
use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

/// Size of the Anchor discriminator prefix.
pub const DISCRIMINATOR_LEN: usize = 8;

/// Discriminator, five addresses, `fee_bps: u16` and `bump: u8`.
pub const POOL_ACCOUNT_LEN: usize = DISCRIMINATOR_LEN + 32 * 5 + 2 + 1;

/// Raw pool account as stored on chain.
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct PoolAccount {
    pub discriminator: [u8; 8],
    pub mint_a: [u8; 32],
    pub mint_b: [u8; 32],
    pub token_reserve_a: [u8; 32],
    pub token_reserve_b: [u8; 32],
    pub lp_mint: [u8; 32],
    pub fee_bps: u16,
    pub bump: u8,
}

impl PoolAccount {
    /// Decodes account data. Trailing bytes after the known fields are ignored.
    pub fn decode(address: &Pubkey, data: &[u8]) -> Result<Self, LedgerError> {
        if data.len() < POOL_ACCOUNT_LEN {
            return Err(LedgerError::invalid_data(
                address,
                format!("expected {POOL_ACCOUNT_LEN} bytes, got {}", data.len()),
            ));
        }
        let mut slice = data;
        Self::deserialize(&mut slice).map_err(|e| LedgerError::invalid_data(address, e))
    }
}

/// A decoded pool record with typed addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolRecord {
    pub address: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub reserve_a: Pubkey,
    pub reserve_b: Pubkey,
    pub lp_mint: Pubkey,
    pub fee_bps: u16,
    pub bump: u8,
}

impl PoolRecord {
    /// Decodes the pool account stored at `address`.
    pub fn from_account_data(address: Pubkey, data: &[u8]) -> Result<Self, LedgerError> {
        let account = PoolAccount::decode(&address, data)?;
        Ok(Self::from_account(address, &account))
    }

    pub fn from_account(address: Pubkey, account: &PoolAccount) -> Self {
        Self {
            address,
            mint_a: Pubkey::new_from_array(account.mint_a),
            mint_b: Pubkey::new_from_array(account.mint_b),
            reserve_a: Pubkey::new_from_array(account.token_reserve_a),
            reserve_b: Pubkey::new_from_array(account.token_reserve_b),
            lp_mint: Pubkey::new_from_array(account.lp_mint),
            fee_bps: account.fee_bps,
            bump: account.bump,
        }
    }
}
