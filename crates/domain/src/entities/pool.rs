use crate::entities::token::Token;
use crate::error::DomainError;
use crate::value_objects::amount::Amount;
use crate::value_objects::percentage::Percentage;
use crate::value_objects::price::Price;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fee rates are expressed against this denominator.
pub const FEE_BPS_DENOMINATOR: u32 = 10_000;

/// Which way a swap crosses the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Sell token A, receive token B.
    AToB,
    /// Sell token B, receive token A.
    BToA,
}

/// Point-in-time view of one pool, assembled from reads joined at the same moment.
///
/// Snapshots are replaced wholesale on every refresh and never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub address: String,
    pub token_a: Token,
    pub token_b: Token,
    pub reserve_a: Amount,
    pub reserve_b: Amount,
    pub reserve_a_address: String,
    pub reserve_b_address: String,
    pub lp_mint: String,
    /// Loaded on demand; background refreshes leave it empty.
    pub lp_supply: Option<Amount>,
    pub fee_bps: u16,
    pub fetched_at: DateTime<Utc>,
}

impl PoolSnapshot {
    /// Checks the invariants a snapshot must satisfy before it is published.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidFee`] when the fee is not below 100%, and
    /// [`DomainError::InvalidPair`] when both sides hold the same mint.
    pub fn validate(&self) -> Result<(), DomainError> {
        if u32::from(self.fee_bps) >= FEE_BPS_DENOMINATOR {
            return Err(DomainError::InvalidFee(u32::from(self.fee_bps)));
        }
        if self.token_a.mint_address == self.token_b.mint_address {
            return Err(DomainError::invalid_pair(
                &self.token_a.mint_address,
                &self.token_b.mint_address,
                "pool holds the same mint twice",
            ));
        }
        Ok(())
    }

    /// Human-scaled reserve of token A.
    pub fn balance_a(&self) -> Decimal {
        self.reserve_a.to_decimal()
    }

    /// Human-scaled reserve of token B.
    pub fn balance_b(&self) -> Decimal {
        self.reserve_b.to_decimal()
    }

    pub fn fee_rate(&self) -> Percentage {
        Percentage::from_bps(u32::from(self.fee_bps))
    }

    /// True before the first deposit, when both reserves are empty.
    pub fn is_empty(&self) -> bool {
        self.reserve_a.is_zero() && self.reserve_b.is_zero()
    }

    /// Whether this pool trades `mint_x` against `mint_y`, in either order.
    pub fn connects(&self, mint_x: &str, mint_y: &str) -> bool {
        let a = self.token_a.mint_address.as_str();
        let b = self.token_b.mint_address.as_str();
        (a == mint_x && b == mint_y) || (a == mint_y && b == mint_x)
    }

    /// Direction of a swap that sells `input_mint`.
    pub fn direction_for_input(&self, input_mint: &str) -> Option<SwapDirection> {
        if self.token_a.mint_address == input_mint {
            Some(SwapDirection::AToB)
        } else if self.token_b.mint_address == input_mint {
            Some(SwapDirection::BToA)
        } else {
            None
        }
    }

    /// `(input reserve, output reserve)` for a swap in `direction`.
    pub fn reserves_for(&self, direction: SwapDirection) -> (Amount, Amount) {
        match direction {
            SwapDirection::AToB => (self.reserve_a, self.reserve_b),
            SwapDirection::BToA => (self.reserve_b, self.reserve_a),
        }
    }

    /// `(input token, output token)` for a swap in `direction`.
    pub fn tokens_for(&self, direction: SwapDirection) -> (&Token, &Token) {
        match direction {
            SwapDirection::AToB => (&self.token_a, &self.token_b),
            SwapDirection::BToA => (&self.token_b, &self.token_a),
        }
    }

    /// Units of token B per unit of token A at current reserves.
    pub fn price_a_in_b(&self) -> Price {
        Price::from_ratio(self.balance_b(), self.balance_a())
    }

    /// Time elapsed since the reads behind this snapshot completed.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.fetched_at)
    }

    #[must_use]
    pub fn with_lp_supply(mut self, lp_supply: Amount) -> Self {
        self.lp_supply = Some(lp_supply);
        self
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub const SOL: &str = "So11111111111111111111111111111111111111112";
    pub const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
    pub const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

    /// A pool with both sides at the given raw reserves.
    pub fn pool(address: &str, mint_a: &str, mint_b: &str, reserve_a: u64, reserve_b: u64) -> PoolSnapshot {
        PoolSnapshot {
            address: address.to_string(),
            token_a: Token::new(mint_a, "A", 9, "Token A"),
            token_b: Token::new(mint_b, "B", 6, "Token B"),
            reserve_a: Amount::from_raw(reserve_a, 9),
            reserve_b: Amount::from_raw(reserve_b, 6),
            reserve_a_address: format!("{address}-reserve-a"),
            reserve_b_address: format!("{address}-reserve-b"),
            lp_mint: format!("{address}-lp"),
            lp_supply: None,
            fee_bps: 30,
            fetched_at: Utc::now(),
        }
    }
}
