//! Expiry Reaper
//!
//! Background task that periodically removes expired entries that no read
//! has touched since they went stale.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::error::{CacheError, Result};

/// Handle to the sweep task owned by one `TtlCache`.
///
/// Dropping the handle also stops the task, since the shutdown channel closes.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(TtlCache::new());
/// let reaper = Reaper::spawn(cache.clone(), Duration::from_secs(300))?;
/// // Later, during shutdown:
/// reaper.stop().await;
/// ```
#[derive(Debug)]
pub struct Reaper {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Reaper {
    /// Spawns the sweep loop for `cache`, running every `interval`.
    ///
    /// Fails with `InvalidArgument` for a zero interval or when the cache
    /// already has a running reaper. Must be called inside a Tokio runtime.
    pub fn spawn<V>(cache: Arc<TtlCache<V>>, interval: Duration) -> Result<Self>
    where
        V: Send + Sync + 'static,
    {
        if interval.is_zero() {
            return Err(CacheError::invalid("reaper interval must be greater than zero"));
        }
        if !cache.attach_reaper() {
            return Err(CacheError::invalid("a reaper is already running for this cache"));
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_sweeps(cache, interval, shutdown_rx));

        Ok(Self {
            shutdown_tx,
            handle,
        })
    }

    /// Signals the loop to exit and waits for it.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(err) = self.handle.await {
            warn!("Reaper task ended abnormally: {}", err);
        }
    }

    /// Returns true once the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

async fn run_sweeps<V>(
    cache: Arc<TtlCache<V>>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(
        "Starting expiry reaper with interval of {} seconds",
        interval.as_secs_f64()
    );

    let mut ticker = tokio::time::interval(interval);
    // A sweep that overruns its slot must not be followed by a burst of catch-up sweeps
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // Skip the immediate first tick
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = cache.purge_expired();
                if removed > 0 {
                    info!("Expiry sweep: removed {} expired entries", removed);
                } else {
                    debug!("Expiry sweep: no expired entries found");
                }
            }
            changed = shutdown_rx.changed() => {
                // Err means every sender is gone, which is also a stop signal
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    cache.detach_reaper();
    info!("Expiry reaper stopped");
}
