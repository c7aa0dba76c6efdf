//! Minimum-acceptable bounds derived from a quote and a user tolerance.
//!
//! All LP arithmetic runs on raw ledger integers widened to `U256`. Each bound
//! is floored so the submitted minimum never exceeds what the program can pay.

use crate::entities::pool::PoolSnapshot;
use crate::error::DomainError;
use crate::value_objects::tolerance::SlippageTolerance;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const BPS_DENOMINATOR: u32 = 10_000;

/// Raw reserves and LP supply of one pool, as used by the liquidity bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveState {
    pub pool: String,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub lp_supply: u64,
}

impl ReserveState {
    pub fn new(pool: impl Into<String>, reserve_a: u64, reserve_b: u64, lp_supply: u64) -> Self {
        Self {
            pool: pool.into(),
            reserve_a,
            reserve_b,
            lp_supply,
        }
    }

    /// Reads reserves from a snapshot. A missing LP supply is taken as zero.
    pub fn from_snapshot(pool: &PoolSnapshot) -> Self {
        Self::new(
            pool.address.clone(),
            pool.reserve_a.as_u64(),
            pool.reserve_b.as_u64(),
            pool.lp_supply.map(|s| s.as_u64()).unwrap_or(0),
        )
    }

    /// The pool has never been funded.
    pub fn is_first_deposit(&self) -> bool {
        self.reserve_a == 0 && self.reserve_b == 0
    }

    fn insufficient(&self) -> DomainError {
        DomainError::insufficient_liquidity(self.pool.clone())
    }
}

/// LP tokens a deposit is expected to mint, and the floor the user accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpMintEstimate {
    pub first_deposit: bool,
    /// Proportional share implied by token A; `None` on a first deposit.
    pub lp_from_a: Option<u64>,
    /// Proportional share implied by token B; `None` on a first deposit.
    pub lp_from_b: Option<u64>,
    pub expected_lp: u64,
    pub min_lp: u64,
}

/// Token amounts a burn redeems, and the floors the user accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawEstimate {
    pub lp_tokens_to_burn: u64,
    pub amount_a: u64,
    pub amount_b: u64,
    pub min_amount_a: u64,
    pub min_amount_b: u64,
}

fn saturating_u64(value: U256) -> u64 {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.low_u64()
    }
}

/// `floor(value * (10000 - bps) / 10000)`
fn apply_tolerance(value: U256, tolerance: SlippageTolerance) -> U256 {
    value * U256::from(tolerance.retained_bps()) / U256::from(BPS_DENOMINATOR)
}

/// `quoted_output * (1 - tolerance)` on a human-scaled amount.
pub fn derive_minimum_output(quoted_output: Decimal, tolerance: SlippageTolerance) -> Decimal {
    if quoted_output <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    quoted_output * Decimal::from(tolerance.retained_bps()) / Decimal::from(BPS_DENOMINATOR)
}

/// `floor(quoted_output * (1 - tolerance))` on a raw amount.
pub fn derive_minimum_output_raw(quoted_output: u64, tolerance: SlippageTolerance) -> u64 {
    saturating_u64(apply_tolerance(U256::from(quoted_output), tolerance))
}

/// Expected and minimum LP tokens for depositing `amount_a` and `amount_b`.
///
/// An unfunded pool mints `sqrt(amount_a * amount_b)`. A funded pool mints the
/// smaller of the two proportional shares, so an off-ratio deposit is bounded
/// by its scarcer side.
///
/// # Errors
/// [`DomainError::ZeroAmount`] if either amount is zero, and
/// [`DomainError::InsufficientLiquidity`] for a funded pool with an empty
/// reserve or no LP supply.
pub fn derive_minimum_lp_tokens(
    amount_a: u64,
    amount_b: u64,
    state: &ReserveState,
    tolerance: SlippageTolerance,
) -> Result<LpMintEstimate, DomainError> {
    if amount_a == 0 || amount_b == 0 {
        return Err(DomainError::ZeroAmount);
    }

    if state.is_first_deposit() {
        let expected = (U256::from(amount_a) * U256::from(amount_b)).integer_sqrt();
        return Ok(LpMintEstimate {
            first_deposit: true,
            lp_from_a: None,
            lp_from_b: None,
            expected_lp: saturating_u64(expected),
            min_lp: saturating_u64(apply_tolerance(expected, tolerance)),
        });
    }

    if state.reserve_a == 0 || state.reserve_b == 0 || state.lp_supply == 0 {
        return Err(state.insufficient());
    }

    let supply = U256::from(state.lp_supply);
    let lp_from_a = U256::from(amount_a) * supply / U256::from(state.reserve_a);
    let lp_from_b = U256::from(amount_b) * supply / U256::from(state.reserve_b);
    let expected = lp_from_a.min(lp_from_b);

    Ok(LpMintEstimate {
        first_deposit: false,
        lp_from_a: Some(saturating_u64(lp_from_a)),
        lp_from_b: Some(saturating_u64(lp_from_b)),
        expected_lp: saturating_u64(expected),
        min_lp: saturating_u64(apply_tolerance(expected, tolerance)),
    })
}

/// Proportional redemption for burning `lp_tokens`, with floored minimums.
///
/// # Errors
/// [`DomainError::ZeroAmount`] for a zero burn, and
/// [`DomainError::InsufficientLiquidity`] when the pool has no supply or the
/// burn exceeds it.
pub fn derive_withdraw_amounts(
    lp_tokens: u64,
    state: &ReserveState,
    tolerance: SlippageTolerance,
) -> Result<WithdrawEstimate, DomainError> {
    if lp_tokens == 0 {
        return Err(DomainError::ZeroAmount);
    }
    if state.lp_supply == 0 || lp_tokens > state.lp_supply {
        return Err(state.insufficient());
    }

    let lp = U256::from(lp_tokens);
    let supply = U256::from(state.lp_supply);
    let amount_a = lp * U256::from(state.reserve_a) / supply;
    let amount_b = lp * U256::from(state.reserve_b) / supply;

    Ok(WithdrawEstimate {
        lp_tokens_to_burn: lp_tokens,
        amount_a: saturating_u64(amount_a),
        amount_b: saturating_u64(amount_b),
        min_amount_a: saturating_u64(apply_tolerance(amount_a, tolerance)),
        min_amount_b: saturating_u64(apply_tolerance(amount_b, tolerance)),
    })
}

/// Token B amount that matches `amount_a` at the pool ratio.
///
/// `None` when token A's reserve is empty and there is no ratio to follow.
pub fn pair_deposit_amount(amount_a: u64, reserve_a: u64, reserve_b: u64) -> Option<u64> {
    if reserve_a == 0 {
        return None;
    }
    let paired = U256::from(amount_a) * U256::from(reserve_b) / U256::from(reserve_a);
    Some(saturating_u64(paired))
}
