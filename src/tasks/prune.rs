//! Prune Task
//!
//! Background task that periodically removes stale memoized results.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::memoize::CacheControl;

/// Spawns a background task that periodically prunes stale results.
///
/// Reads only ever see fresh results anyway; pruning releases the memory held
/// by stale entries that are never read again.
///
/// # Arguments
/// * `cache` - Shared memoized wrapper
/// * `interval` - Time between prune runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let lookup = Arc::new(memoize_async_with(fetch, options)?);
/// let prune_handle = spawn_prune_task(lookup.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// prune_handle.abort();
/// ```
pub fn spawn_prune_task<C>(cache: Arc<C>, interval: Duration) -> JoinHandle<()>
where
    C: CacheControl + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Starting prune task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let before = cache.len();
            cache.delete_expired_cache();
            let removed = before.saturating_sub(cache.len());

            if removed > 0 {
                info!("Prune: removed {} stale entries", removed);
            } else {
                debug!("Prune: no stale entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::memoize::{memoize_with, MemoizeOptions};

    #[tokio::test]
    async fn test_prune_task_removes_stale_entries() {
        let clock = ManualClock::new(0);
        let cache = Arc::new(
            memoize_with(
                |n: u32| n + 1,
                MemoizeOptions::new()
                    .time_to_live_ms(1_000.0)
                    .clock(clock.clone()),
            )
            .unwrap(),
        );

        cache.call(1);
        clock.advance(500);
        cache.call(2);
        assert_eq!(cache.len(), 2);

        clock.set(1_200);
        let handle = spawn_prune_task(cache.clone(), Duration::from_millis(20));

        // Wait for prune to run
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.len(), 1, "only the first entry has gone stale");
        assert_eq!(cache.stats().expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_prune_task_preserves_fresh_entries() {
        let cache = Arc::new(memoize_with(|n: u32| n, MemoizeOptions::new()).unwrap());
        cache.call(7);

        let handle = spawn_prune_task(cache.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.len(), 1);
        handle.abort();
    }

    #[tokio::test]
    async fn test_prune_task_can_be_aborted() {
        let cache = Arc::new(memoize_with(|n: u32| n, MemoizeOptions::new()).unwrap());

        let handle = spawn_prune_task(cache, Duration::from_secs(1));
        handle.abort();

        let result = handle.await;
        assert!(result.unwrap_err().is_cancelled());
    }
}
