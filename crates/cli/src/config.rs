//! Runtime configuration from the environment.

use anyhow::{Context, Result, anyhow};
use cpamm_execution::cache::CacheConfig;
use cpamm_domain::quote::QuoteConfig;
use cpamm_domain::value_objects::SlippageTolerance;
use cpamm_protocols::rpc::{DEVNET_RPC_URL, RpcConfig};
use cpamm_protocols::token_registry::DEVNET_CHAIN_ID;
use solana_sdk::pubkey::Pubkey;
use std::path::PathBuf;
use std::str::FromStr;

pub const RPC_URL: &str = "CPAMM_RPC_URL";
pub const PROGRAM_ID: &str = "CPAMM_PROGRAM_ID";
pub const TOKEN_LIST: &str = "CPAMM_TOKEN_LIST";
pub const CLUSTER_CHAIN_ID: &str = "CPAMM_CLUSTER_CHAIN_ID";
pub const REFRESH_SECS: &str = "CPAMM_REFRESH_SECS";
pub const SLIPPAGE_BPS: &str = "CPAMM_SLIPPAGE_BPS";
pub const SAFETY_MARGIN_BPS: &str = "CPAMM_SAFETY_MARGIN_BPS";

/// Settings for one CLI run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rpc_url: String,
    pub program_id: Pubkey,
    pub token_list: Option<PathBuf>,
    pub chain_id: u64,
    pub refresh_secs: u64,
    pub slippage: SlippageTolerance,
    pub safety_margin_bps: u32,
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, applying defaults for optional keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let program_id = lookup(PROGRAM_ID)
            .ok_or_else(|| anyhow!("{PROGRAM_ID} must be set in .env or environment"))?;
        let program_id = Pubkey::from_str(&program_id)
            .with_context(|| format!("{PROGRAM_ID} is not a valid address"))?;

        let slippage_bps: u32 = parse_or(&lookup, SLIPPAGE_BPS, 50)?;
        let slippage = SlippageTolerance::from_bps(slippage_bps)
            .with_context(|| format!("{SLIPPAGE_BPS} is out of range"))?;

        let refresh_secs: u64 = parse_or(&lookup, REFRESH_SECS, 30)?;
        if refresh_secs == 0 {
            return Err(anyhow!("{REFRESH_SECS} must be at least 1"))
                .context("refresh period out of range");
        }

        Ok(Self {
            rpc_url: lookup(RPC_URL).unwrap_or_else(|| DEVNET_RPC_URL.to_string()),
            program_id,
            token_list: lookup(TOKEN_LIST).map(PathBuf::from),
            chain_id: parse_or(&lookup, CLUSTER_CHAIN_ID, DEVNET_CHAIN_ID)?,
            refresh_secs,
            slippage,
            safety_margin_bps: parse_or(&lookup, SAFETY_MARGIN_BPS, 10)?,
        })
    }

    pub fn rpc_config(&self) -> RpcConfig {
        RpcConfig::with_url(self.rpc_url.clone())
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            staleness_secs: self.refresh_secs,
        }
    }

    pub fn quote_config(&self) -> QuoteConfig {
        QuoteConfig {
            reserve_safety_margin_bps: self.safety_margin_bps,
            default_tolerance: self.slippage,
            ..QuoteConfig::default()
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key}={raw} is not valid")),
        None => Ok(default),
    }
}
