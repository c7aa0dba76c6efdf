//! Pool state cache.
//!
//! The cache publishes an immutable [`PoolSet`] behind an `Arc` and replaces it
//! wholesale after each refresh. Readers clone the `Arc` and never hold a lock
//! across an await, so an in-flight quote keeps the set it started with.

mod enrichment;

use crate::error::CacheError;
use chrono::{DateTime, Utc};
use cpamm_domain::DomainError;
use cpamm_domain::entities::{PoolSnapshot, Token};
use cpamm_domain::resolver::{find_direct_pool, resolve_pair, token_catalog};
use cpamm_domain::value_objects::Amount;
use cpamm_protocols::ledger::LedgerReader;
use cpamm_protocols::token_registry::TokenRegistry;
use enrichment::enrich_pool;
use futures::future::join_all;
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Configuration for the pool cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a published set is considered fresh, in seconds.
    pub staleness_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { staleness_secs: 30 }
    }
}

impl CacheConfig {
    pub fn staleness(&self) -> Duration {
        Duration::from_secs(self.staleness_secs)
    }
}

/// An immutable collection of pool snapshots keyed by pool address.
#[derive(Debug, Clone, Default)]
pub struct PoolSet {
    pools: BTreeMap<String, PoolSnapshot>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl PoolSet {
    pub fn new(pools: impl IntoIterator<Item = PoolSnapshot>, refreshed_at: DateTime<Utc>) -> Self {
        Self {
            pools: pools
                .into_iter()
                .map(|pool| (pool.address.clone(), pool))
                .collect(),
            refreshed_at: Some(refreshed_at),
        }
    }

    pub fn get(&self, address: &str) -> Option<&PoolSnapshot> {
        self.pools.get(address)
    }

    /// Snapshots in pool address order.
    pub fn iter(&self) -> impl Iterator<Item = &PoolSnapshot> {
        self.pools.values()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// When this set was published; `None` before the first refresh.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn find_direct_pool(&self, mint_x: &str, mint_y: &str) -> Option<&PoolSnapshot> {
        find_direct_pool(self.iter(), mint_x, mint_y)
    }

    pub fn resolve_pair(&self, mint_x: &str, mint_y: &str) -> Result<&PoolSnapshot, DomainError> {
        resolve_pair(self.iter(), mint_x, mint_y)
    }

    /// Distinct tokens across all pools, ordered by mint.
    pub fn tokens(&self) -> Vec<Token> {
        token_catalog(self.iter())
    }
}

/// Result of one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Pools published in this cycle.
    pub refreshed: Vec<String>,
    /// Pools left out, with the reason.
    pub failed: Vec<(String, String)>,
    /// Wall time of the cycle in milliseconds.
    pub elapsed_ms: u64,
}

/// What a call to [`PoolStateCache::refresh`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed(RefreshReport),
    /// Another refresh was already in flight.
    Skipped,
}

/// Clears the in-flight flag when a refresh ends or its future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Read-only mirror of every pool the program owns.
pub struct PoolStateCache {
    /// Ledger reader.
    ledger: Arc<dyn LedgerReader>,
    /// Token metadata source.
    registry: Arc<dyn TokenRegistry>,
    /// Configuration.
    config: CacheConfig,
    /// Published pool set.
    pools: RwLock<Arc<PoolSet>>,
    /// Set while a full refresh runs.
    refreshing: AtomicBool,
}

impl PoolStateCache {
    /// Creates an empty cache. Nothing is read until [`PoolStateCache::refresh`].
    pub fn new(
        ledger: Arc<dyn LedgerReader>,
        registry: Arc<dyn TokenRegistry>,
        config: CacheConfig,
    ) -> Self {
        Self {
            ledger,
            registry,
            config,
            pools: RwLock::new(Arc::new(PoolSet::default())),
            refreshing: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn ledger(&self) -> Arc<dyn LedgerReader> {
        Arc::clone(&self.ledger)
    }

    /// The currently published set.
    pub async fn snapshot(&self) -> Arc<PoolSet> {
        Arc::clone(&*self.pools.read().await)
    }

    /// Reloads every pool and publishes the new set.
    ///
    /// Pools whose enrichment fails are left out and reported; the rest are
    /// published. Returns [`RefreshOutcome::Skipped`] when a refresh is
    /// already running.
    ///
    /// # Errors
    /// Fails only when the pool list itself cannot be read. The previously
    /// published set stays in place.
    pub async fn refresh(&self) -> Result<RefreshOutcome, CacheError> {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Refresh already in flight, skipping");
            return Ok(RefreshOutcome::Skipped);
        }
        let _in_flight = InFlight(&self.refreshing);
        let started = Instant::now();

        let records = self.ledger.pool_records().await?;
        debug!(pools = records.len(), "Enriching pool records");

        let ledger = self.ledger.as_ref();
        let registry = self.registry.as_ref();
        let results = join_all(records.iter().map(|record| async move {
            (record.address, enrich_pool(ledger, registry, record, false).await)
        }))
        .await;

        let mut report = RefreshReport::default();
        let mut snapshots = Vec::with_capacity(results.len());
        for (address, result) in results {
            let validated = result
                .map_err(CacheError::from)
                .and_then(|snapshot| {
                    snapshot.validate()?;
                    Ok(snapshot)
                });
            match validated {
                Ok(snapshot) => {
                    report.refreshed.push(snapshot.address.clone());
                    snapshots.push(snapshot);
                }
                Err(e) => {
                    warn!(pool = %address, error = %e, "Pool enrichment failed");
                    report.failed.push((address.to_string(), e.to_string()));
                }
            }
        }

        let set = PoolSet::new(snapshots, Utc::now());
        report.refreshed.sort();
        *self.pools.write().await = Arc::new(set);
        report.elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            refreshed = report.refreshed.len(),
            failed = report.failed.len(),
            elapsed_ms = report.elapsed_ms,
            "Pool cache refreshed"
        );
        Ok(RefreshOutcome::Completed(report))
    }

    /// Reads one pool directly, LP supply included.
    ///
    /// The result goes to the caller only; the published set is not touched.
    pub async fn fetch_one(&self, address: &str) -> Result<PoolSnapshot, CacheError> {
        let pubkey = parse_address(address)?;
        let record = self.ledger.pool_record(&pubkey).await?;
        let snapshot =
            enrich_pool(self.ledger.as_ref(), self.registry.as_ref(), &record, true).await?;
        snapshot.validate()?;
        debug!(pool = %address, "Fetched single pool");
        Ok(snapshot)
    }

    /// Reads the LP supply of a cached pool.
    pub async fn lp_supply(&self, address: &str) -> Result<Amount, CacheError> {
        let lp_mint = {
            let set = self.snapshot().await;
            let pool = set
                .get(address)
                .ok_or_else(|| CacheError::PoolNotFound(address.to_string()))?;
            parse_address(&pool.lp_mint)?
        };
        let mint = self.ledger.mint(&lp_mint).await?;
        Ok(Amount::from_raw(mint.supply, mint.decimals))
    }

    /// Distinct tokens across the published set.
    pub async fn tokens(&self) -> Vec<Token> {
        self.snapshot().await.tokens()
    }

    /// Time since the published set was refreshed; `None` before the first refresh.
    pub async fn age(&self) -> Option<chrono::Duration> {
        self.snapshot()
            .await
            .refreshed_at()
            .map(|at| Utc::now().signed_duration_since(at))
    }

    /// Whether the published set is older than the staleness window.
    pub async fn is_stale(&self) -> bool {
        match self.age().await {
            Some(age) => age
                .to_std()
                .is_ok_and(|age| age > self.config.staleness()),
            None => true,
        }
    }
}

pub(crate) fn parse_address(address: &str) -> Result<Pubkey, CacheError> {
    Pubkey::from_str(address).map_err(|_| CacheError::invalid_address(address))
}
