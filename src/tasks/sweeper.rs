//! Sweeper Task
//!
//! Background task that periodically reclaims store entries past the store's
//! life window and admission windows that have closed. It never looks at
//! entry expiration metadata: that stays enforced lazily by readers.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::admission::AdmissionController;
use crate::cache::MemoryStore;

/// Spawns the sweeper.
///
/// # Arguments
/// * `store` - Store whose stale entries are reclaimed
/// * `limiter` - Admission controller whose closed windows are dropped
/// * `interval_secs` - Seconds between sweeps
///
/// # Returns
/// A JoinHandle to abort the task during graceful shutdown.
pub fn spawn_sweeper_task(
    store: Arc<MemoryStore>,
    limiter: Arc<AdmissionController>,
    interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting sweeper task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let purged = store.purge_stale();
            let windows = limiter.purge_expired();

            if purged > 0 || windows > 0 {
                info!(
                    "Sweep: removed {} stale entries and {} closed admission windows",
                    purged, windows
                );
            } else {
                debug!("Sweep: nothing to reclaim");
            }
        }
    })
}
