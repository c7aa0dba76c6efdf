use crate::entities::pool::PoolSnapshot;
use crate::entities::token::Token;
use crate::value_objects::amount::Amount;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fractional digits kept when computing a pool share.
const SHARE_SCALE: u32 = 6;

/// A wallet's LP holding in one pool.
///
/// Only built for a non-zero balance; an absent LP account is not a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPosition {
    pub pool_address: String,
    pub owner: String,
    pub token_a: Token,
    pub token_b: Token,
    pub lp_mint: String,
    pub lp_balance: Amount,
    pub lp_supply: Amount,
    /// Percent of the LP supply held, in `[0, 100]`.
    pub share_of_pool: Decimal,
    pub fee_bps: u16,
}

impl UserPosition {
    /// Builds a position from a pool snapshot and the observed balances.
    ///
    /// Returns `None` for a zero balance.
    pub fn from_pool(
        pool: &PoolSnapshot,
        owner: impl Into<String>,
        lp_balance: Amount,
        lp_supply: Amount,
    ) -> Option<Self> {
        if lp_balance.is_zero() {
            return None;
        }
        Some(Self {
            pool_address: pool.address.clone(),
            owner: owner.into(),
            token_a: pool.token_a.clone(),
            token_b: pool.token_b.clone(),
            lp_mint: pool.lp_mint.clone(),
            share_of_pool: share_of_pool(lp_balance.raw, lp_supply.raw),
            lp_balance,
            lp_supply,
            fee_bps: pool.fee_bps,
        })
    }

    /// Human-scaled LP balance.
    pub fn lp_balance_human(&self) -> Decimal {
        self.lp_balance.to_decimal()
    }
}

/// `balance / supply * 100` in fixed point, capped at 100.
///
/// A zero supply yields zero.
pub fn share_of_pool(balance: U256, supply: U256) -> Decimal {
    if supply.is_zero() {
        return Decimal::ZERO;
    }
    let scale = U256::exp10(SHARE_SCALE as usize);
    let hundred = U256::from(100u8);
    let scaled = balance
        .saturating_mul(hundred)
        .saturating_mul(scale)
        .checked_div(supply)
        .unwrap_or_default()
        .min(hundred * scale);

    Decimal::from_i128_with_scale(scaled.as_u128() as i128, SHARE_SCALE)
}
