//! Terminal rendering.

use cpamm_domain::entities::{PoolSnapshot, Token, UserPosition};
use cpamm_domain::quote::{DepositQuote, SwapQuote, WithdrawQuote};
use prettytable::{Table, row};
use serde::Serialize;

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn pair_label(pool: &PoolSnapshot) -> String {
    format!("{}/{}", pool.token_a.symbol, pool.token_b.symbol)
}

pub fn pools_table(pools: &[&PoolSnapshot]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Pool", "Pair", "Reserve A", "Reserve B", "Fee", "Price A/B"]);
    for pool in pools {
        table.add_row(row![
            pool.address,
            pair_label(pool),
            pool.reserve_a,
            pool.reserve_b,
            format!("{}%", pool.fee_rate().as_percent().normalize()),
            pool.price_a_in_b()
        ]);
    }
    table
}

pub fn pool_detail_table(pool: &PoolSnapshot) -> Table {
    let lp_supply = pool
        .lp_supply
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut table = Table::new();
    table.add_row(row!["Pool", pool.address]);
    table.add_row(row!["Pair", pair_label(pool)]);
    table.add_row(row!["Token A", pool.token_a.mint_address]);
    table.add_row(row!["Token B", pool.token_b.mint_address]);
    table.add_row(row!["Reserve A", pool.reserve_a]);
    table.add_row(row!["Reserve B", pool.reserve_b]);
    table.add_row(row!["LP mint", pool.lp_mint]);
    table.add_row(row!["LP supply", lp_supply]);
    table.add_row(row!["Fee", format!("{} bps", pool.fee_bps)]);
    table.add_row(row!["Fetched at", pool.fetched_at.to_rfc3339()]);
    table
}

pub fn tokens_table(tokens: &[Token]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Mint", "Symbol", "Name", "Decimals"]);
    for token in tokens {
        table.add_row(row![token.mint_address, token.symbol, token.name, token.decimals]);
    }
    table
}

pub fn swap_quote_table(quote: &SwapQuote) -> Table {
    let (sold, bought) = (&quote.input_token.symbol, &quote.output_token.symbol);
    let impact = if quote.high_price_impact {
        format!("{}% (high)", quote.price_impact.round_dp(4))
    } else {
        format!("{}%", quote.price_impact.round_dp(4))
    };
    let tolerance = if quote.tolerance.is_high() {
        format!("{} (high)", quote.tolerance)
    } else {
        quote.tolerance.to_string()
    };

    let mut table = Table::new();
    table.add_row(row!["Pool", quote.pool]);
    table.add_row(row!["You pay", format!("{} {sold}", quote.amount_in)]);
    table.add_row(row!["You receive", format!("{} {bought}", quote.amount_out)]);
    table.add_row(row!["Minimum received", format!("{} {bought}", quote.minimum_received)]);
    table.add_row(row!["Fee", format!("{} {sold}", quote.fee)]);
    table.add_row(row!["Price impact", impact]);
    table.add_row(row!["Spot price", format!("1 {sold} = {} {bought}", quote.spot_price)]);
    table.add_row(row!["Slippage tolerance", tolerance]);
    table.add_row(row![
        "Instruction args",
        format!(
            "amount_in={} min_amount_out={}",
            quote.params.amount_in, quote.params.min_amount_out
        )
    ]);
    table
}

pub fn deposit_quote_table(quote: &DepositQuote) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Pool", quote.pool]);
    table.add_row(row!["Amount A", quote.amount_a]);
    table.add_row(row!["Amount B", quote.amount_b]);
    table.add_row(row!["First deposit", quote.estimate.first_deposit]);
    table.add_row(row!["Expected LP (raw)", quote.estimate.expected_lp]);
    table.add_row(row!["Minimum LP (raw)", quote.estimate.min_lp]);
    table.add_row(row!["Share after", format!("{}%", quote.share_after.normalize())]);
    table.add_row(row!["Slippage tolerance", quote.tolerance]);
    table
}

pub fn withdraw_quote_table(quote: &WithdrawQuote) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Pool", quote.pool]);
    table.add_row(row!["LP burned", quote.lp_tokens]);
    table.add_row(row!["Amount A", quote.amount_a]);
    table.add_row(row!["Amount B", quote.amount_b]);
    table.add_row(row!["Minimum A", quote.min_amount_a]);
    table.add_row(row!["Minimum B", quote.min_amount_b]);
    table.add_row(row!["Slippage tolerance", quote.tolerance]);
    table
}

pub fn positions_table(positions: &[UserPosition]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Pool", "Pair", "LP balance", "Share", "Fee"]);
    for position in positions {
        table.add_row(row![
            position.pool_address,
            format!("{}/{}", position.token_a.symbol, position.token_b.symbol),
            position.lp_balance,
            format!("{}%", position.share_of_pool.normalize()),
            format!("{} bps", position.fee_bps)
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cpamm_domain::value_objects::Amount;

    fn pool() -> PoolSnapshot {
        PoolSnapshot {
            address: "pool-1".to_string(),
            token_a: Token::new("mint-a", "SOL", 9, "Wrapped SOL"),
            token_b: Token::unknown("mint-b", 6),
            reserve_a: Amount::from_raw(2_000_000_000, 9),
            reserve_b: Amount::from_raw(300_000_000, 6),
            reserve_a_address: "reserve-a".to_string(),
            reserve_b_address: "reserve-b".to_string(),
            lp_mint: "lp".to_string(),
            lp_supply: None,
            fee_bps: 30,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_pools_table() {
        let pool = pool();
        let table = pools_table(&[&pool]);
        assert_eq!(table.len(), 1);
        assert_eq!(pair_label(&pool), "SOL/UNKNOWN");

        let rendered = table.to_string();
        assert!(rendered.contains("pool-1"));
        assert!(rendered.contains("0.3%"));
        assert!(rendered.contains("150"));
    }

    #[test]
    fn test_pool_detail_shows_missing_supply() {
        let rendered = pool_detail_table(&pool()).to_string();
        assert!(rendered.contains("LP supply"));
        assert!(rendered.contains("30 bps"));
    }
}
