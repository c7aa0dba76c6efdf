//! Periodic cache refresh.
//!
//! The scheduler ticks at the cache's staleness window and calls
//! [`PoolStateCache::refresh`]. Missed ticks are skipped rather than queued,
//! and the cache itself drops a tick that lands during a running refresh.

use crate::cache::{PoolStateCache, RefreshOutcome, RefreshReport};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

/// Shortest accepted tick period; `interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Event sent after each tick.
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// A refresh ran to completion.
    Refreshed {
        report: RefreshReport,
        triggered_at: Instant,
    },
    /// The tick found a refresh already running.
    Skipped { triggered_at: Instant },
    /// The pool list could not be read.
    Failed {
        error: String,
        /// Whether the next tick may succeed.
        transient: bool,
        triggered_at: Instant,
    },
}

/// Drives [`PoolStateCache::refresh`] on a fixed interval.
pub struct RefreshScheduler {
    /// Cache to refresh.
    cache: Arc<PoolStateCache>,
    /// Tick period.
    period: Duration,
    /// Event sender.
    event_tx: mpsc::Sender<RefreshEvent>,
    /// Event receiver.
    event_rx: Option<mpsc::Receiver<RefreshEvent>>,
    /// Running flag.
    running: Arc<AtomicBool>,
}

impl RefreshScheduler {
    /// Creates a scheduler ticking at the cache's staleness window.
    pub fn new(cache: Arc<PoolStateCache>) -> Self {
        let period = cache.config().staleness();
        Self::with_period(cache, period)
    }

    /// Creates a scheduler with an explicit period, raised to at least one millisecond.
    pub fn with_period(cache: Arc<PoolStateCache>, period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(16);
        Self {
            cache,
            period: period.max(MIN_PERIOD),
            event_tx: tx,
            event_rx: Some(rx),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Takes the event receiver for processing events.
    pub fn take_receiver(&mut self) -> Option<mpsc::Receiver<RefreshEvent>> {
        self.event_rx.take()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Runs until [`RefreshScheduler::stop`]. The first refresh happens immediately.
    pub async fn run(&self) {
        self.running.store(true, Ordering::SeqCst);
        info!(period_ms = self.period.as_millis() as u64, "Starting refresh scheduler");

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while self.running.load(Ordering::SeqCst) {
            let triggered_at = ticker.tick().await;
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            let event = match self.cache.refresh().await {
                Ok(RefreshOutcome::Completed(report)) => RefreshEvent::Refreshed {
                    report,
                    triggered_at,
                },
                Ok(RefreshOutcome::Skipped) => {
                    debug!("Tick skipped, refresh in flight");
                    RefreshEvent::Skipped { triggered_at }
                }
                Err(e) => {
                    let transient = e.is_transient();
                    if transient {
                        warn!(error = %e, "Pool refresh failed, retrying next tick");
                    } else {
                        error!(error = %e, "Pool refresh failed");
                    }
                    RefreshEvent::Failed {
                        error: e.to_string(),
                        transient,
                        triggered_at,
                    }
                }
            };

            // Nobody has to listen; a full or closed channel drops the event.
            if let Err(e) = self.event_tx.try_send(event) {
                debug!(error = %e, "Refresh event not delivered");
            }
        }

        info!("Refresh scheduler stopped");
    }

    /// Moves the scheduler onto a background task.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    /// Stops the scheduler after the current tick.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Checks if the scheduler is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
