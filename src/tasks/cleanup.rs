//! TTL Cleanup Task
//!
//! Periodic sweep so that cache memory stays bounded even for keys that are
//! never read again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a task that calls [`TtlCache::cleanup`](crate::cache::TtlCache::cleanup)
/// on `cache` every `interval`.
///
/// The first sweep happens one full interval after spawning. The returned
/// handle is aborted on dispose or shutdown.
///
/// # Example
/// ```ignore
/// let cache = shared(TtlCache::<u64>::new(system_clock()));
/// let handle = spawn_cleanup_task("dashboard", cache.clone(), Duration::from_secs(1800));
/// // Later:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task<T>(
    name: &'static str,
    cache: SharedCache<T>,
    interval: Duration,
) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(cache = name, ?interval, "Starting TTL cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = cache.write().await;
                guard.cleanup()
            };

            if removed > 0 {
                info!(cache = name, removed, "TTL cleanup removed expired entries");
            } else {
                debug!(cache = name, "TTL cleanup: no expired entries found");
            }
        }
    })
}
