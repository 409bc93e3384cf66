//! Garbage Collection Task
//!
//! Background task that periodically runs a garbage-collection pass over
//! the cache collection.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::DistributedCache;
use crate::error::CacheError;

/// Spawns a background task that calls
/// [`DistributedCache::collect_garbage`] every `interval`.
///
/// The task stops when `shutdown` is cancelled; a pass in progress at that
/// moment is interrupted between store calls. A failed pass is logged and
/// retried at the next tick.
///
/// # Example
/// ```ignore
/// let shutdown = CancellationToken::new();
/// let handle = spawn_gc_task(cache.clone(), Duration::from_secs(60), shutdown.clone());
/// // Later, during shutdown:
/// shutdown.cancel();
/// handle.await.ok();
/// ```
pub fn spawn_gc_task(
    cache: Arc<DistributedCache>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting garbage collection task with interval of {:?}",
            interval
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            match cache.collect_garbage(&shutdown).await {
                Ok(report) if report.total_deleted() > 0 => {
                    info!("GC: removed {} expired entries", report.total_deleted());
                }
                Ok(_) => debug!("GC: no expired entries found"),
                Err(CacheError::Cancelled) => break,
                Err(e) => warn!("GC pass failed: {}", e),
            }
        }

        info!("Garbage collection task stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EntryOptions;
    use crate::config::CacheConfig;
    use crate::store::MemoryStore;

    fn cache_with_store() -> (Arc<DistributedCache>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let cache = DistributedCache::new(CacheConfig::default(), store.clone()).unwrap();
        (Arc::new(cache), store)
    }

    #[tokio::test]
    async fn test_gc_task_removes_expired_entries() {
        let (cache, store) = cache_with_store();
        let opts = EntryOptions::new().with_absolute_relative_to_now(chrono::Duration::seconds(-1));
        cache.set("expired", b"v".to_vec(), &opts).await.unwrap();

        let shutdown = CancellationToken::new();
        let handle = spawn_gc_task(cache.clone(), Duration::from_millis(50), shutdown.clone());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(store.is_empty("Sessions"), "Expired entry should have been collected");

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_gc_task_preserves_valid_entries() {
        let (cache, store) = cache_with_store();
        let opts = EntryOptions::new().with_sliding(chrono::Duration::hours(1));
        cache.set("long_lived", b"value".to_vec(), &opts).await.unwrap();

        let shutdown = CancellationToken::new();
        let handle = spawn_gc_task(cache.clone(), Duration::from_millis(50), shutdown.clone());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(store.len("Sessions"), 1);
        assert_eq!(
            cache.get("long_lived").await.unwrap(),
            Some(b"value".to_vec())
        );

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_gc_task_survives_store_failure() {
        let (cache, store) = cache_with_store();
        store.set_offline(true);

        let shutdown = CancellationToken::new();
        let handle = spawn_gc_task(cache.clone(), Duration::from_millis(20), shutdown.clone());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!handle.is_finished(), "Task should keep running after a failed pass");

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_gc_task_stops_on_shutdown() {
        let (cache, _) = cache_with_store();
        let shutdown = CancellationToken::new();
        let handle = spawn_gc_task(cache, Duration::from_secs(3600), shutdown.clone());

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should stop promptly")
            .unwrap();
    }
}
