//! Swap and liquidity quotes assembled from one pool snapshot.
//!
//! Amounts travel as raw ledger integers; human values are derived from them
//! for display only.

use crate::entities::pool::{PoolSnapshot, SwapDirection};
use crate::entities::position::share_of_pool;
use crate::entities::token::Token;
use crate::error::DomainError;
use crate::math::constant_product::{
    BPS_DENOMINATOR, DEFAULT_RESERVE_SAFETY_MARGIN_BPS, calculate_spot_price,
    compute_output_amount_raw, compute_price_impact_with_margin, compute_required_input_raw,
};
use crate::params::{AddLiquidityParams, SwapParams, WithdrawLiquidityParams};
use crate::slippage::{
    LpMintEstimate, ReserveState, WithdrawEstimate, derive_minimum_lp_tokens,
    derive_minimum_output_raw, derive_withdraw_amounts,
};
use crate::value_objects::amount::Amount;
use crate::value_objects::price::Price;
use crate::value_objects::tolerance::SlippageTolerance;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for quote assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Share of the output reserve withheld from any single quote.
    pub reserve_safety_margin_bps: u32,
    /// Tolerance used when the caller does not pick one.
    pub default_tolerance: SlippageTolerance,
    /// Price impact, in percent, above which a quote is flagged.
    pub high_price_impact_percent: Decimal,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            reserve_safety_margin_bps: DEFAULT_RESERVE_SAFETY_MARGIN_BPS,
            default_tolerance: SlippageTolerance::default(),
            high_price_impact_percent: Decimal::from(5),
        }
    }
}

/// A priced swap through one pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub pool: String,
    pub direction: SwapDirection,
    pub input_token: Token,
    pub output_token: Token,
    pub amount_in: Amount,
    pub amount_out: Amount,
    pub minimum_received: Amount,
    /// Part of `amount_in` kept by the pool as fee.
    pub fee: Amount,
    /// Percent.
    pub price_impact: Decimal,
    /// Output per input at current reserves.
    pub spot_price: Price,
    /// Output per input actually received.
    pub execution_price: Price,
    pub tolerance: SlippageTolerance,
    pub high_price_impact: bool,
    pub params: SwapParams,
}

impl SwapQuote {
    /// Quotes selling `amount_in` raw units of `input_mint`.
    ///
    /// # Errors
    /// [`DomainError::TokenNotInPool`] for a foreign mint,
    /// [`DomainError::ZeroAmount`] for a zero input, and
    /// [`DomainError::InsufficientLiquidity`] when either reserve is empty.
    pub fn exact_input(
        pool: &PoolSnapshot,
        input_mint: &str,
        amount_in: u64,
        tolerance: SlippageTolerance,
        config: &QuoteConfig,
    ) -> Result<Self, DomainError> {
        let direction = direction_or_err(pool, input_mint)?;
        if amount_in == 0 {
            return Err(DomainError::ZeroAmount);
        }

        let (reserve_in, reserve_out) = pool.reserves_for(direction);
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(DomainError::insufficient_liquidity(pool.address.clone()));
        }
        let (input_token, output_token) = pool.tokens_for(direction);
        let fee_bps = u32::from(pool.fee_bps);

        let amount_out_raw = compute_output_amount_raw(
            amount_in,
            reserve_in.as_u64(),
            reserve_out.as_u64(),
            fee_bps,
            config.reserve_safety_margin_bps,
        );
        let minimum_raw = derive_minimum_output_raw(amount_out_raw, tolerance);
        let fee_raw = U256::from(amount_in) * U256::from(fee_bps) / U256::from(BPS_DENOMINATOR);

        let amount_in = Amount::from_raw(amount_in, input_token.decimals);
        let amount_out = Amount::from_raw(amount_out_raw, output_token.decimals);
        let price_impact = compute_price_impact_with_margin(
            amount_in.to_decimal(),
            reserve_in.to_decimal(),
            reserve_out.to_decimal(),
            fee_bps,
            config.reserve_safety_margin_bps,
        );

        Ok(Self {
            pool: pool.address.clone(),
            direction,
            input_token: input_token.clone(),
            output_token: output_token.clone(),
            amount_in,
            amount_out,
            minimum_received: Amount::from_raw(minimum_raw, output_token.decimals),
            fee: Amount::new(fee_raw, input_token.decimals),
            price_impact,
            spot_price: calculate_spot_price(reserve_in.to_decimal(), reserve_out.to_decimal()),
            execution_price: Price::from_ratio(amount_out.to_decimal(), amount_in.to_decimal()),
            tolerance,
            high_price_impact: price_impact > config.high_price_impact_percent,
            params: SwapParams {
                amount_in: amount_in.as_u64(),
                min_amount_out: minimum_raw,
            },
        })
    }

    /// Quotes receiving at least `desired_out` raw units of `output_mint`.
    ///
    /// # Errors
    /// As [`SwapQuote::exact_input`], plus [`DomainError::InsufficientLiquidity`]
    /// when the target is at or beyond what the pool may pay out.
    pub fn exact_output(
        pool: &PoolSnapshot,
        output_mint: &str,
        desired_out: u64,
        tolerance: SlippageTolerance,
        config: &QuoteConfig,
    ) -> Result<Self, DomainError> {
        let direction = match direction_or_err(pool, output_mint)? {
            SwapDirection::AToB => SwapDirection::BToA,
            SwapDirection::BToA => SwapDirection::AToB,
        };
        if desired_out == 0 {
            return Err(DomainError::ZeroAmount);
        }

        let (reserve_in, reserve_out) = pool.reserves_for(direction);
        let required = compute_required_input_raw(
            desired_out,
            reserve_in.as_u64(),
            reserve_out.as_u64(),
            u32::from(pool.fee_bps),
        )
        .ok_or_else(|| DomainError::insufficient_liquidity(pool.address.clone()))?;

        let (input_token, _) = pool.tokens_for(direction);
        let quote = Self::exact_input(pool, &input_token.mint_address, required, tolerance, config)?;
        if quote.amount_out.as_u64() < desired_out {
            // The safety margin caps the payout below the target.
            return Err(DomainError::insufficient_liquidity(pool.address.clone()));
        }
        Ok(quote)
    }
}

fn direction_or_err(pool: &PoolSnapshot, mint: &str) -> Result<SwapDirection, DomainError> {
    pool.direction_for_input(mint)
        .ok_or_else(|| DomainError::TokenNotInPool {
            pool: pool.address.clone(),
            mint: mint.to_string(),
        })
}

fn loaded_lp_supply(pool: &PoolSnapshot) -> Result<Amount, DomainError> {
    pool.lp_supply.ok_or_else(|| DomainError::LpSupplyUnavailable {
        pool: pool.address.clone(),
    })
}

/// A priced deposit into one pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositQuote {
    pub pool: String,
    pub amount_a: Amount,
    pub amount_b: Amount,
    pub estimate: LpMintEstimate,
    /// Percent of the pool the depositor would hold afterwards.
    pub share_after: Decimal,
    pub tolerance: SlippageTolerance,
    pub params: AddLiquidityParams,
}

impl DepositQuote {
    /// Quotes depositing `amount_a` and `amount_b` raw units.
    ///
    /// A funded pool needs its LP supply loaded on the snapshot.
    ///
    /// # Errors
    /// [`DomainError::LpSupplyUnavailable`] when a funded pool has no supply
    /// loaded, otherwise as [`derive_minimum_lp_tokens`].
    pub fn new(
        pool: &PoolSnapshot,
        amount_a: u64,
        amount_b: u64,
        tolerance: SlippageTolerance,
    ) -> Result<Self, DomainError> {
        let supply = if pool.is_empty() {
            0
        } else {
            loaded_lp_supply(pool)?.as_u64()
        };
        let state = ReserveState::new(
            pool.address.clone(),
            pool.reserve_a.as_u64(),
            pool.reserve_b.as_u64(),
            supply,
        );
        let estimate = derive_minimum_lp_tokens(amount_a, amount_b, &state, tolerance)?;

        let supply_after = U256::from(supply) + U256::from(estimate.expected_lp);
        let share_after = share_of_pool(U256::from(estimate.expected_lp), supply_after);

        Ok(Self {
            pool: pool.address.clone(),
            amount_a: Amount::from_raw(amount_a, pool.token_a.decimals),
            amount_b: Amount::from_raw(amount_b, pool.token_b.decimals),
            share_after,
            tolerance,
            params: AddLiquidityParams {
                max_amount_a: amount_a,
                max_amount_b: amount_b,
                min_lp_tokens: estimate.min_lp,
            },
            estimate,
        })
    }
}

/// A priced LP burn in one pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawQuote {
    pub pool: String,
    pub lp_tokens: Amount,
    pub amount_a: Amount,
    pub amount_b: Amount,
    pub min_amount_a: Amount,
    pub min_amount_b: Amount,
    pub tolerance: SlippageTolerance,
    pub params: WithdrawLiquidityParams,
}

impl WithdrawQuote {
    /// Quotes burning `lp_tokens` raw LP units.
    ///
    /// # Errors
    /// [`DomainError::LpSupplyUnavailable`] without a loaded supply, otherwise
    /// as [`derive_withdraw_amounts`].
    pub fn new(
        pool: &PoolSnapshot,
        lp_tokens: u64,
        tolerance: SlippageTolerance,
    ) -> Result<Self, DomainError> {
        let supply = loaded_lp_supply(pool)?;
        let state = ReserveState::new(
            pool.address.clone(),
            pool.reserve_a.as_u64(),
            pool.reserve_b.as_u64(),
            supply.as_u64(),
        );
        let WithdrawEstimate {
            lp_tokens_to_burn,
            amount_a,
            amount_b,
            min_amount_a,
            min_amount_b,
        } = derive_withdraw_amounts(lp_tokens, &state, tolerance)?;

        let (decimals_a, decimals_b) = (pool.token_a.decimals, pool.token_b.decimals);
        Ok(Self {
            pool: pool.address.clone(),
            lp_tokens: Amount::from_raw(lp_tokens_to_burn, supply.decimals),
            amount_a: Amount::from_raw(amount_a, decimals_a),
            amount_b: Amount::from_raw(amount_b, decimals_b),
            min_amount_a: Amount::from_raw(min_amount_a, decimals_a),
            min_amount_b: Amount::from_raw(min_amount_b, decimals_b),
            tolerance,
            params: WithdrawLiquidityParams {
                lp_tokens_to_burn,
                min_amount_a,
                min_amount_b,
            },
        })
    }
}
