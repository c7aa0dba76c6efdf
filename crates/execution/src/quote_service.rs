//! Quotes against the published pool set.
//!
//! Swaps price off the cached snapshot. Deposits and withdrawals read the
//! pool again so reserves and LP supply come from the same join.
//!
//! Human amounts are floored to raw units at the token's decimals before any
//! math runs.

use crate::cache::PoolStateCache;
use crate::error::CacheError;
use cpamm_domain::DomainError;
use cpamm_domain::entities::PoolSnapshot;
use cpamm_domain::quote::{DepositQuote, QuoteConfig, SwapQuote, WithdrawQuote};
use cpamm_domain::slippage::pair_deposit_amount;
use cpamm_domain::value_objects::{Amount, SlippageTolerance};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

/// Joins the cache, the resolver and the quote math.
pub struct QuoteService {
    cache: Arc<PoolStateCache>,
    config: QuoteConfig,
}

impl QuoteService {
    pub fn new(cache: Arc<PoolStateCache>, config: QuoteConfig) -> Self {
        Self { cache, config }
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    fn tolerance(&self, tolerance: Option<SlippageTolerance>) -> SlippageTolerance {
        tolerance.unwrap_or(self.config.default_tolerance)
    }

    /// Quotes selling `amount_in` of `from` for `to`.
    pub async fn swap_quote(
        &self,
        from: &str,
        to: &str,
        amount_in: Decimal,
        tolerance: Option<SlippageTolerance>,
    ) -> Result<SwapQuote, CacheError> {
        let pools = self.cache.snapshot().await;
        let pool = pools.resolve_pair(from, to)?;
        let (input, _) = pool
            .direction_for_input(from)
            .map(|d| pool.tokens_for(d))
            .ok_or_else(|| CacheError::PoolNotFound(pool.address.clone()))?;
        let raw_in = Amount::from_decimal(amount_in, input.decimals)?;

        debug!(pool = %pool.address, from, to, amount_in = %amount_in, "Quoting swap");
        Ok(SwapQuote::exact_input(
            pool,
            from,
            raw_in.as_u64(),
            self.tolerance(tolerance),
            &self.config,
        )?)
    }

    /// Quotes receiving at least `desired_out` of `to` for `from`.
    pub async fn exact_output_quote(
        &self,
        from: &str,
        to: &str,
        desired_out: Decimal,
        tolerance: Option<SlippageTolerance>,
    ) -> Result<SwapQuote, CacheError> {
        let pools = self.cache.snapshot().await;
        let pool = pools.resolve_pair(from, to)?;
        let (output, _) = pool
            .direction_for_input(to)
            .map(|d| pool.tokens_for(d))
            .ok_or_else(|| CacheError::PoolNotFound(pool.address.clone()))?;
        let raw_out = Amount::from_decimal(desired_out, output.decimals)?;

        debug!(pool = %pool.address, from, to, desired_out = %desired_out, "Quoting exact output");
        Ok(SwapQuote::exact_output(
            pool,
            to,
            raw_out.as_u64(),
            self.tolerance(tolerance),
            &self.config,
        )?)
    }

    /// Reads a cached pool again, reserves and LP supply in one join.
    async fn fresh_pool(&self, pool_address: &str) -> Result<PoolSnapshot, CacheError> {
        if self.cache.snapshot().await.get(pool_address).is_none() {
            return Err(CacheError::PoolNotFound(pool_address.to_string()));
        }
        self.cache.fetch_one(pool_address).await
    }

    /// Quotes a deposit. Without `amount_b`, the counter-amount at the pool ratio is used.
    pub async fn deposit_quote(
        &self,
        pool_address: &str,
        amount_a: Decimal,
        amount_b: Option<Decimal>,
        tolerance: Option<SlippageTolerance>,
    ) -> Result<DepositQuote, CacheError> {
        let pool = self.fresh_pool(pool_address).await?;

        let raw_a = Amount::from_decimal(amount_a, pool.token_a.decimals)?.as_u64();
        let raw_b = match amount_b {
            Some(amount) => Amount::from_decimal(amount, pool.token_b.decimals)?.as_u64(),
            None => pair_deposit_amount(raw_a, pool.reserve_a.as_u64(), pool.reserve_b.as_u64())
                .ok_or_else(|| CacheError::PairedAmountRequired(pool_address.to_string()))?,
        };

        debug!(pool = %pool_address, raw_a, raw_b, "Quoting deposit");
        Ok(DepositQuote::new(
            &pool,
            raw_a,
            raw_b,
            self.tolerance(tolerance),
        )?)
    }

    /// Quotes burning `lp_tokens` LP tokens.
    pub async fn withdraw_quote(
        &self,
        pool_address: &str,
        lp_tokens: Decimal,
        tolerance: Option<SlippageTolerance>,
    ) -> Result<WithdrawQuote, CacheError> {
        let pool = self.fresh_pool(pool_address).await?;
        let supply = pool
            .lp_supply
            .ok_or_else(|| DomainError::LpSupplyUnavailable {
                pool: pool.address.clone(),
            })?;
        let raw_lp = Amount::from_decimal(lp_tokens, supply.decimals)?.as_u64();

        debug!(pool = %pool_address, raw_lp, "Quoting withdrawal");
        Ok(WithdrawQuote::new(&pool, raw_lp, self.tolerance(tolerance))?)
    }
}
