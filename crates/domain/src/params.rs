//! Instruction arguments handed to the transaction submitter.
//!
//! Every field is a raw integer already scaled by the token's decimals.

use serde::{Deserialize, Serialize};

/// Arguments of the program's `swap` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapParams {
    pub amount_in: u64,
    pub min_amount_out: u64,
}

/// Arguments of the program's `add_liquidity` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityParams {
    pub max_amount_a: u64,
    pub max_amount_b: u64,
    pub min_lp_tokens: u64,
}

/// Arguments of the program's `withdraw_liquidity` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawLiquidityParams {
    pub lp_tokens_to_burn: u64,
    pub min_amount_a: u64,
    pub min_amount_b: u64,
}
