//! SPL mint and token account decoding.

use crate::error::LedgerError;
use solana_program::program_pack::Pack;
use solana_sdk::account::Account;
use solana_sdk::pubkey::Pubkey;
use spl_token::state::{Account as SplAccount, Mint as SplMint};

/// The parts of a mint the quote engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintInfo {
    pub address: Pubkey,
    pub decimals: u8,
    pub supply: u64,
}

impl MintInfo {
    /// Decodes an SPL mint account.
    pub fn from_account(address: Pubkey, account: &Account) -> Result<Self, LedgerError> {
        ensure_token_program(&address, account)?;
        let mint =
            SplMint::unpack(&account.data).map_err(|e| LedgerError::invalid_data(address, e))?;
        Ok(Self {
            address,
            decimals: mint.decimals,
            supply: mint.supply,
        })
    }
}

/// The parts of a token account the quote engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccountInfo {
    pub address: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

impl TokenAccountInfo {
    /// Decodes an SPL token account.
    pub fn from_account(address: Pubkey, account: &Account) -> Result<Self, LedgerError> {
        ensure_token_program(&address, account)?;
        let token =
            SplAccount::unpack(&account.data).map_err(|e| LedgerError::invalid_data(address, e))?;
        Ok(Self {
            address,
            owner: token.owner,
            mint: token.mint,
            amount: token.amount,
        })
    }
}

fn ensure_token_program(address: &Pubkey, account: &Account) -> Result<(), LedgerError> {
    if account.owner != spl_token::ID {
        return Err(LedgerError::invalid_data(
            address,
            format!("owned by {}, not the token program", account.owner),
        ));
    }
    Ok(())
}
