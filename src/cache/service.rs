//! Distributed Cache Service
//!
//! Point get/set/refresh/remove over a [`DocumentStore`], plus the entry
//! point for garbage collection.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::collector::{GarbageCollector, GcReport};
use super::stats::StatsRecorder;
use super::{CacheEntry, CacheStats, EntryOptions, MAX_KEY_LENGTH};
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::store::{DocumentStore, StoreError};

// == Distributed Cache ==
/// A key/value cache whose entries live in a document-store collection.
///
/// Every operation is a single round-trip to the store; no locks are held
/// between calls. Dropping a returned future abandons the in-flight store
/// call.
pub struct DistributedCache {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    collection: String,
    collector: GarbageCollector,
    stats: StatsRecorder,
}

impl DistributedCache {
    // == Constructor ==
    /// Creates a cache over `store` using the system clock.
    ///
    /// Fails with [`CacheError::Configuration`] if the collection name is
    /// empty or whitespace, or the page size is zero.
    pub fn new(config: CacheConfig, store: Arc<dyn DocumentStore>) -> Result<Self> {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: CacheConfig,
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if config.collection.trim().is_empty() {
            return Err(CacheError::Configuration(
                "Collection name cannot be empty".to_string(),
            ));
        }
        if config.page_size == 0 {
            return Err(CacheError::Configuration(
                "Garbage-collection page size must be at least 1".to_string(),
            ));
        }

        let collector = GarbageCollector::new(
            store.clone(),
            clock.clone(),
            config.collection.clone(),
            config.page_size,
            config.max_sliding_pages,
        );

        Ok(Self {
            store,
            clock,
            collection: config.collection,
            collector,
            stats: StatsRecorder::default(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    // == Get ==
    /// Returns the stored bytes, or None if the key is missing or expired.
    ///
    /// Expired entries are left in place for garbage collection.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;

        let doc = self.store.get(&self.collection, key).await?;
        let now = self.clock.now();

        match doc {
            Some(doc) if doc.entry.is_valid(now) => {
                self.stats.record_hit();
                Ok(Some(doc.entry.value))
            }
            Some(doc) => {
                debug!(
                    key,
                    expires_at = ?doc.entry.expires_at(),
                    "Entry expired, treating as absent"
                );
                self.stats.record_miss();
                Ok(None)
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry entirely.
    pub async fn set(&self, key: &str, value: Vec<u8>, options: &EntryOptions) -> Result<()> {
        validate_key(key)?;

        let now = self.clock.now();
        let entry = CacheEntry::new(
            value,
            options.resolve_absolute(now),
            options.sliding_expiration,
            now,
        );

        self.store.put(&self.collection, key, entry).await?;
        self.stats.record_set();
        debug!(key, "Entry set");
        Ok(())
    }

    // == Refresh ==
    /// Restarts the sliding window of an existing entry.
    ///
    /// Value and expiration settings are untouched. Fails with
    /// [`CacheError::NotFound`] if the key does not exist.
    pub async fn refresh(&self, key: &str) -> Result<()> {
        validate_key(key)?;

        let now = self.clock.now();
        match self
            .store
            .update_last_refresh(&self.collection, key, now)
            .await
        {
            Ok(()) => {
                self.stats.record_refresh();
                debug!(key, "Entry refreshed");
                Ok(())
            }
            Err(StoreError::NotFound(_)) => Err(CacheError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    // == Remove ==
    /// Deletes the entry. Removing a missing key succeeds.
    pub async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;

        self.store.delete(&self.collection, key).await?;
        self.stats.record_removal();
        debug!(key, "Entry removed");
        Ok(())
    }

    // == Collect Garbage ==
    /// Runs one two-phase garbage-collection pass over the collection.
    ///
    /// Must be invoked by the caller; the cache never schedules it.
    pub async fn collect_garbage(&self, cancel: &CancellationToken) -> Result<GcReport> {
        let report = self.collector.collect(cancel).await?;
        self.stats
            .record_gc_run(report.total_deleted() as u64, report.aborted_batches as u64);
        Ok(report)
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
