//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use cpamm_domain::prelude::*;
//! ```

pub use crate::entities::{PoolSnapshot, SwapDirection, Token, UserPosition};
pub use crate::error::DomainError;
pub use crate::math::constant_product::{
    compute_output_amount, compute_output_amount_raw, compute_price_impact,
    compute_required_input,
};
pub use crate::params::{AddLiquidityParams, SwapParams, WithdrawLiquidityParams};
pub use crate::quote::{DepositQuote, QuoteConfig, SwapQuote, WithdrawQuote};
pub use crate::resolver::{find_direct_pool, resolve_pair, token_catalog};
pub use crate::slippage::{
    LpMintEstimate, ReserveState, WithdrawEstimate, derive_minimum_lp_tokens,
    derive_minimum_output, derive_minimum_output_raw, derive_withdraw_amounts,
    pair_deposit_amount,
};
pub use crate::value_objects::{
    amount::Amount, percentage::Percentage, price::Price, tolerance::SlippageTolerance,
};
