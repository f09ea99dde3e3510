//! Expiry Sweep Task
//!
//! Background task that periodically drops expired cache entries so their
//! memory is reclaimed before anything reads them again. Lazy expiry on
//! `get` and on eviction stays in force whether or not this task runs.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::handle::SharedCache;

/// Shortest period between sweeps.
const MIN_SWEEP_PERIOD: Duration = Duration::from_secs(1);

/// Sweep period for `interval_secs`, never shorter than one second.
fn sweep_period(interval_secs: u64) -> Duration {
    Duration::from_secs(interval_secs).max(MIN_SWEEP_PERIOD)
}

/// Spawns a background task that purges expired entries every
/// `interval_secs` seconds. An interval of zero is raised to one second.
///
/// Returns a JoinHandle for the spawned task, which can be used to abort the
/// task during shutdown.
///
/// # Example
/// ```ignore
/// let cache = SharedCache::<String>::with_max_items(1000);
/// let sweep_handle = spawn_expiry_sweep(cache.clone(), 1);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_expiry_sweep<V>(cache: SharedCache<V>, interval_secs: u64) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    let interval = sweep_period(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
