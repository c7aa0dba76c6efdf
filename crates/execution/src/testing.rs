//! In-memory ledger for tests.

use async_trait::async_trait;
use cpamm_protocols::LedgerError;
use cpamm_protocols::ledger::LedgerReader;
use cpamm_protocols::program::pda::derive_associated_token_address;
use cpamm_protocols::program::pool_account::PoolRecord;
use cpamm_protocols::token::{MintInfo, TokenAccountInfo};
use solana_sdk::pubkey::Pubkey;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub(crate) struct MockLedger {
    pools: Vec<PoolRecord>,
    mints: Mutex<HashMap<Pubkey, MintInfo>>,
    accounts: Mutex<HashMap<Pubkey, TokenAccountInfo>>,
    failing: HashSet<Pubkey>,
    list_delay: Option<Duration>,
    list_failure: AtomicBool,
}

impl MockLedger {
    pub const DECIMALS_A: u8 = 6;
    pub const DECIMALS_B: u8 = 9;
    pub const LP_DECIMALS: u8 = 9;
    pub const LP_SUPPLY: u64 = 1_000_000;

    pub fn new() -> Self {
        Self {
            pools: Vec::new(),
            mints: Mutex::new(HashMap::new()),
            accounts: Mutex::new(HashMap::new()),
            failing: HashSet::new(),
            list_delay: None,
            list_failure: AtomicBool::new(false),
        }
    }

    /// Adds a pool with fresh mints and reserve accounts holding the given amounts.
    pub fn add_pool(&mut self, reserve_a: u64, reserve_b: u64, fee_bps: u16) -> PoolRecord {
        let record = PoolRecord {
            address: Pubkey::new_unique(),
            mint_a: Pubkey::new_unique(),
            mint_b: Pubkey::new_unique(),
            reserve_a: Pubkey::new_unique(),
            reserve_b: Pubkey::new_unique(),
            lp_mint: Pubkey::new_unique(),
            fee_bps,
            bump: 255,
        };
        self.insert_mint(record.mint_a, Self::DECIMALS_A, 0);
        self.insert_mint(record.mint_b, Self::DECIMALS_B, 0);
        self.insert_mint(record.lp_mint, Self::LP_DECIMALS, Self::LP_SUPPLY);
        self.insert_token_account(record.reserve_a, record.address, record.mint_a, reserve_a);
        self.insert_token_account(record.reserve_b, record.address, record.mint_b, reserve_b);
        self.pools.push(record);
        record
    }

    /// Gives `owner` an associated LP token account in `pool`.
    pub fn add_lp_holding(&mut self, pool: &PoolRecord, owner: &Pubkey, amount: u64) -> Pubkey {
        let ata = derive_associated_token_address(owner, &pool.lp_mint);
        self.insert_token_account(ata, *owner, pool.lp_mint, amount);
        ata
    }

    /// Reads of `address` fail with a network error.
    pub fn fail_account(&mut self, address: Pubkey) {
        self.failing.insert(address);
    }

    pub fn remove_account(&mut self, address: Pubkey) {
        self.mints.get_mut().unwrap().remove(&address);
        self.accounts.get_mut().unwrap().remove(&address);
    }

    /// Moves a pool's reserves and LP supply, as a landed deposit or withdrawal would.
    pub fn set_pool_state(&self, pool: &PoolRecord, reserve_a: u64, reserve_b: u64, lp_supply: u64) {
        let mut accounts = self.accounts.lock().unwrap();
        for (address, amount) in [(pool.reserve_a, reserve_a), (pool.reserve_b, reserve_b)] {
            if let Some(account) = accounts.get_mut(&address) {
                account.amount = amount;
            }
        }
        if let Some(mint) = self.mints.lock().unwrap().get_mut(&pool.lp_mint) {
            mint.supply = lp_supply;
        }
    }

    pub fn set_list_delay(&mut self, delay: Duration) {
        self.list_delay = Some(delay);
    }

    pub fn set_list_failure(&self, fail: bool) {
        self.list_failure.store(fail, Ordering::SeqCst);
    }

    fn insert_mint(&mut self, address: Pubkey, decimals: u8, supply: u64) {
        self.mints.get_mut().unwrap().insert(
            address,
            MintInfo {
                address,
                decimals,
                supply,
            },
        );
    }

    fn insert_token_account(&mut self, address: Pubkey, owner: Pubkey, mint: Pubkey, amount: u64) {
        self.accounts.get_mut().unwrap().insert(
            address,
            TokenAccountInfo {
                address,
                owner,
                mint,
                amount,
            },
        );
    }

    fn check(&self, address: &Pubkey) -> Result<(), LedgerError> {
        if self.failing.contains(address) {
            return Err(LedgerError::Network(format!("connection reset reading {address}")));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerReader for MockLedger {
    async fn pool_records(&self) -> Result<Vec<PoolRecord>, LedgerError> {
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        if self.list_failure.load(Ordering::SeqCst) {
            return Err(LedgerError::Network("rpc unavailable".to_string()));
        }
        Ok(self.pools.clone())
    }

    async fn pool_record(&self, address: &Pubkey) -> Result<PoolRecord, LedgerError> {
        self.check(address)?;
        self.pools
            .iter()
            .find(|p| p.address == *address)
            .copied()
            .ok_or_else(|| LedgerError::AccountNotFound(address.to_string()))
    }

    async fn mint(&self, address: &Pubkey) -> Result<MintInfo, LedgerError> {
        self.check(address)?;
        self.mints
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .ok_or_else(|| LedgerError::AccountNotFound(address.to_string()))
    }

    async fn token_account(&self, address: &Pubkey) -> Result<TokenAccountInfo, LedgerError> {
        self.check(address)?;
        self.accounts
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .ok_or_else(|| LedgerError::AccountNotFound(address.to_string()))
    }
}
