//! Command line front end for the constant-product AMM quote companion.

mod config;
mod output;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use config::AppConfig;
use cpamm_domain::value_objects::SlippageTolerance;
use cpamm_execution::cache::{PoolSet, PoolStateCache, RefreshOutcome};
use cpamm_execution::positions::PositionTracker;
use cpamm_execution::quote_service::QuoteService;
use cpamm_execution::scheduler::{RefreshEvent, RefreshScheduler};
use cpamm_protocols::ledger::{LedgerReader, SolanaLedger};
use cpamm_protocols::rpc::RpcProvider;
use cpamm_protocols::token_registry::{StaticTokenRegistry, TokenRegistry};
use dotenv::dotenv;
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cpamm")]
#[command(about = "Quotes and pool state for a constant-product AMM", long_about = None)]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// RPC endpoint, overrides CPAMM_RPC_URL
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every pool
    Pools,
    /// Show one pool read directly from the ledger
    Pool {
        /// Pool address
        address: String,
    },
    /// List the tokens traded by any pool
    Tokens,
    /// Quote a swap
    SwapQuote {
        /// Token sold (mint or symbol)
        #[arg(long)]
        from: String,

        /// Token bought (mint or symbol)
        #[arg(long)]
        to: String,

        /// Amount sold, or amount bought with --exact-out
        #[arg(long)]
        amount: Decimal,

        /// Treat --amount as the output to receive
        #[arg(long)]
        exact_out: bool,

        /// Slippage tolerance in basis points
        #[arg(long)]
        slippage_bps: Option<u32>,
    },
    /// Quote a liquidity deposit
    DepositQuote {
        /// Pool address
        #[arg(long)]
        pool: String,

        /// Amount of token A
        #[arg(long)]
        amount_a: Decimal,

        /// Amount of token B; defaults to the pool ratio
        #[arg(long)]
        amount_b: Option<Decimal>,

        /// Slippage tolerance in basis points
        #[arg(long)]
        slippage_bps: Option<u32>,
    },
    /// Quote a liquidity withdrawal
    WithdrawQuote {
        /// Pool address
        #[arg(long)]
        pool: String,

        /// LP tokens to burn
        #[arg(long)]
        lp: Decimal,

        /// Slippage tolerance in basis points
        #[arg(long)]
        slippage_bps: Option<u32>,
    },
    /// List a wallet's LP positions
    Positions {
        /// Wallet address
        #[arg(long)]
        owner: String,
    },
    /// Keep the pool cache fresh and log every refresh
    Watch,
}

struct App {
    config: AppConfig,
    cache: Arc<PoolStateCache>,
    ledger: Arc<dyn LedgerReader>,
}

impl App {
    fn new(config: AppConfig) -> Result<Self> {
        let provider = Arc::new(RpcProvider::new(config.rpc_config()));
        let ledger: Arc<dyn LedgerReader> =
            Arc::new(SolanaLedger::new(provider, config.program_id));
        let registry: Arc<dyn TokenRegistry> = match &config.token_list {
            Some(path) => Arc::new(
                StaticTokenRegistry::from_path(path, config.chain_id)
                    .context("Failed to load token list")?,
            ),
            None => Arc::new(StaticTokenRegistry::empty()),
        };
        let cache = Arc::new(PoolStateCache::new(
            Arc::clone(&ledger),
            registry,
            config.cache_config(),
        ));
        Ok(Self {
            config,
            cache,
            ledger,
        })
    }

    /// Refreshes once and returns the published set.
    async fn pools(&self) -> Result<Arc<PoolSet>> {
        if let RefreshOutcome::Completed(report) = self.cache.refresh().await? {
            for (pool, reason) in &report.failed {
                warn!(pool = %pool, reason = %reason, "Pool left out");
            }
        }
        Ok(self.cache.snapshot().await)
    }

    fn quotes(&self) -> QuoteService {
        QuoteService::new(Arc::clone(&self.cache), self.config.quote_config())
    }
}

fn tolerance(slippage_bps: Option<u32>) -> Result<Option<SlippageTolerance>> {
    slippage_bps
        .map(SlippageTolerance::from_bps)
        .transpose()
        .context("Invalid slippage tolerance")
}

/// Accepts a mint address or a symbol known to the pool set.
fn resolve_mint(pools: &PoolSet, token: &str) -> Result<String> {
    let tokens = pools.tokens();
    if tokens.iter().any(|t| t.mint_address == token) {
        return Ok(token.to_string());
    }
    let matches: Vec<_> = tokens
        .iter()
        .filter(|t| !t.is_unknown() && t.symbol.eq_ignore_ascii_case(token))
        .collect();
    match matches.as_slice() {
        [only] => Ok(only.mint_address.clone()),
        [] => Ok(token.to_string()),
        _ => bail!("Symbol {token} is ambiguous; pass the mint address"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(url) = &cli.rpc_url {
        config.rpc_url = url.clone();
    }
    let app = App::new(config)?;

    match &cli.command {
        Commands::Pools => {
            let pools = app.pools().await?;
            let list: Vec<_> = pools.iter().collect();
            if cli.json {
                output::print_json(&list)?;
            } else {
                println!("Found {} pools", list.len());
                output::pools_table(&list).printstd();
            }
        }
        Commands::Pool { address } => {
            let pool = app.cache.fetch_one(address).await?;
            if cli.json {
                output::print_json(&pool)?;
            } else {
                output::pool_detail_table(&pool).printstd();
            }
        }
        Commands::Tokens => {
            let tokens = app.pools().await?.tokens();
            if cli.json {
                output::print_json(&tokens)?;
            } else {
                output::tokens_table(&tokens).printstd();
            }
        }
        Commands::SwapQuote {
            from,
            to,
            amount,
            exact_out,
            slippage_bps,
        } => {
            let pools = app.pools().await?;
            let from = resolve_mint(&pools, from)?;
            let to = resolve_mint(&pools, to)?;
            let tolerance = tolerance(*slippage_bps)?;
            let quotes = app.quotes();

            let quote = if *exact_out {
                quotes.exact_output_quote(&from, &to, *amount, tolerance).await?
            } else {
                quotes.swap_quote(&from, &to, *amount, tolerance).await?
            };
            if cli.json {
                output::print_json(&quote)?;
            } else {
                output::swap_quote_table(&quote).printstd();
                if quote.high_price_impact {
                    println!("Warning: price impact is high");
                }
            }
        }
        Commands::DepositQuote {
            pool,
            amount_a,
            amount_b,
            slippage_bps,
        } => {
            app.pools().await?;
            let quote = app
                .quotes()
                .deposit_quote(pool, *amount_a, *amount_b, tolerance(*slippage_bps)?)
                .await?;
            if cli.json {
                output::print_json(&quote)?;
            } else {
                output::deposit_quote_table(&quote).printstd();
            }
        }
        Commands::WithdrawQuote {
            pool,
            lp,
            slippage_bps,
        } => {
            app.pools().await?;
            let quote = app
                .quotes()
                .withdraw_quote(pool, *lp, tolerance(*slippage_bps)?)
                .await?;
            if cli.json {
                output::print_json(&quote)?;
            } else {
                output::withdraw_quote_table(&quote).printstd();
            }
        }
        Commands::Positions { owner } => {
            let owner = Pubkey::from_str(owner).context("Invalid owner address")?;
            let pools = app.pools().await?;
            let positions = PositionTracker::new(Arc::clone(&app.ledger))
                .enumerate(&pools, &owner)
                .await?;
            if cli.json {
                output::print_json(&positions)?;
            } else if positions.is_empty() {
                println!("No LP positions for {owner}");
            } else {
                output::positions_table(&positions).printstd();
            }
        }
        Commands::Watch => watch(&app).await?,
    }

    Ok(())
}

async fn watch(app: &App) -> Result<()> {
    let mut scheduler = RefreshScheduler::new(Arc::clone(&app.cache));
    let mut events = scheduler
        .take_receiver()
        .context("Scheduler receiver already taken")?;
    let scheduler = Arc::new(scheduler);
    let handle = Arc::clone(&scheduler).spawn();

    info!(period_secs = scheduler.period().as_secs(), "Watching pools, Ctrl-C to stop");
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(RefreshEvent::Refreshed { report, .. }) => {
                    info!(
                        refreshed = report.refreshed.len(),
                        failed = report.failed.len(),
                        elapsed_ms = report.elapsed_ms,
                        "Refresh complete"
                    );
                }
                Some(RefreshEvent::Skipped { .. }) => info!("Refresh skipped"),
                Some(RefreshEvent::Failed { error, transient, .. }) => {
                    warn!(error = %error, transient, "Refresh failed")
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping");
                break;
            }
        }
    }

    scheduler.stop();
    handle.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cpamm_domain::entities::{PoolSnapshot, Token};
    use cpamm_domain::value_objects::Amount;

    fn snapshot(address: &str, a: Token, b: Token) -> PoolSnapshot {
        PoolSnapshot {
            address: address.to_string(),
            reserve_a: Amount::from_raw(1, a.decimals),
            reserve_b: Amount::from_raw(1, b.decimals),
            token_a: a,
            token_b: b,
            reserve_a_address: "ra".to_string(),
            reserve_b_address: "rb".to_string(),
            lp_mint: "lp".to_string(),
            lp_supply: None,
            fee_bps: 30,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolve_mint_by_symbol() {
        let set = PoolSet::new(
            [snapshot(
                "pool-1",
                Token::new("mint-sol", "SOL", 9, "Wrapped SOL"),
                Token::unknown("mint-x", 6),
            )],
            Utc::now(),
        );
        assert_eq!(resolve_mint(&set, "sol").unwrap(), "mint-sol");
        assert_eq!(resolve_mint(&set, "mint-x").unwrap(), "mint-x");
        // Placeholder symbols never resolve.
        assert_eq!(resolve_mint(&set, "UNKNOWN").unwrap(), "UNKNOWN");
    }

    #[test]
    fn test_tolerance_flag() {
        assert_eq!(tolerance(None).unwrap(), None);
        assert_eq!(tolerance(Some(300)).unwrap(), Some(SlippageTolerance::VERY_HIGH));
        assert!(tolerance(Some(10_001)).is_err());
    }

    #[test]
    fn test_cli_parses_swap_quote() {
        let cli = Cli::try_parse_from([
            "cpamm",
            "--json",
            "swap-quote",
            "--from",
            "SOL",
            "--to",
            "USDC",
            "--amount",
            "1.5",
            "--exact-out",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::SwapQuote {
                amount, exact_out, ..
            } => {
                assert_eq!(amount, Decimal::new(15, 1));
                assert!(exact_out);
            }
            _ => panic!("wrong subcommand"),
        }
    }
}
