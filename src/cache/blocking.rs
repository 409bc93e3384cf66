//! Blocking Cache
//!
//! Synchronous wrapper around [`DistributedCache`] for callers outside an
//! async runtime. Each call blocks the current thread until the store
//! responds.

use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tokio_util::sync::CancellationToken;

use super::collector::GcReport;
use super::{CacheStats, DistributedCache, EntryOptions};
use crate::error::{CacheError, Result};

/// Blocking counterpart of [`DistributedCache`] with identical semantics.
///
/// Must not be used from within an async context; the internal runtime
/// panics if asked to block inside another one.
pub struct BlockingCache {
    inner: Arc<DistributedCache>,
    runtime: Runtime,
}

impl BlockingCache {
    pub fn new(inner: Arc<DistributedCache>) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CacheError::Configuration(format!("Failed to build runtime: {}", e)))?;
        Ok(Self { inner, runtime })
    }

    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.runtime.block_on(self.inner.get(key))
    }

    pub fn set(&self, key: &str, value: Vec<u8>, options: &EntryOptions) -> Result<()> {
        self.runtime.block_on(self.inner.set(key, value, options))
    }

    pub fn refresh(&self, key: &str) -> Result<()> {
        self.runtime.block_on(self.inner.refresh(key))
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.runtime.block_on(self.inner.remove(key))
    }

    pub fn collect_garbage(&self, cancel: &CancellationToken) -> Result<GcReport> {
        self.runtime.block_on(self.inner.collect_garbage(cancel))
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::config::CacheConfig;
    use crate::store::MemoryStore;
    use chrono::Duration;

    fn setup() -> (BlockingCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = DistributedCache::with_clock(
            CacheConfig::default(),
            Arc::new(MemoryStore::new()),
            clock.clone(),
        )
        .unwrap();
        (BlockingCache::new(Arc::new(cache)).unwrap(), clock)
    }

    #[test]
    fn test_blocking_round_trip() {
        let (cache, _) = setup();

        cache.set("k", b"v".to_vec(), &EntryOptions::new()).unwrap();
        assert_eq!(cache.get("k").unwrap(), Some(b"v".to_vec()));

        cache.remove("k").unwrap();
        assert_eq!(cache.get("k").unwrap(), None);
    }

    #[test]
    fn test_blocking_sliding_refresh() {
        let (cache, clock) = setup();
        let opts = EntryOptions::new().with_sliding(Duration::seconds(4));

        cache.set("k", b"v".to_vec(), &opts).unwrap();
        clock.advance(Duration::seconds(3));
        cache.refresh("k").unwrap();
        clock.advance(Duration::seconds(3));
        assert_eq!(cache.get("k").unwrap(), Some(b"v".to_vec()));
        clock.advance(Duration::seconds(3));
        assert_eq!(cache.get("k").unwrap(), None);
    }

    #[test]
    fn test_blocking_refresh_missing() {
        let (cache, _) = setup();
        assert!(matches!(cache.refresh("missing"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_blocking_collect_garbage() {
        let (cache, clock) = setup();
        let opts = EntryOptions::new().with_absolute(clock.now() - Duration::seconds(1));
        cache.set("old", b"v".to_vec(), &opts).unwrap();
        cache.set("new", b"v".to_vec(), &EntryOptions::new()).unwrap();

        let report = cache.collect_garbage(&CancellationToken::new()).unwrap();
        assert_eq!(report.absolute_deleted, 1);
        assert_eq!(cache.stats().gc_deleted, 1);
        assert!(cache.get("new").unwrap().is_some());
    }
}
