//! Cache Statistics Module
//!
//! Tracks reads, writes and garbage-collection outcomes.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of the cache counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Gets that returned a live value
    pub hits: u64,
    /// Gets that found nothing or an expired entry
    pub misses: u64,
    pub sets: u64,
    pub refreshes: u64,
    pub removals: u64,
    /// Completed garbage-collection passes
    pub gc_runs: u64,
    /// Entries physically deleted by garbage collection
    pub gc_deleted: u64,
    /// GC batches rejected because an entry changed after it was read
    pub gc_aborted_batches: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by every operation on a cache.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    refreshes: AtomicU64,
    removals: AtomicU64,
    gc_runs: AtomicU64,
    gc_deleted: AtomicU64,
    gc_aborted_batches: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_removal(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_gc_run(&self, deleted: u64, aborted_batches: u64) {
        self.gc_runs.fetch_add(1, Ordering::Relaxed);
        self.gc_deleted.fetch_add(deleted, Ordering::Relaxed);
        self.gc_aborted_batches
            .fetch_add(aborted_batches, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            gc_runs: self.gc_runs.load(Ordering::Relaxed),
            gc_deleted: self.gc_deleted.load(Ordering::Relaxed),
            gc_aborted_batches: self.gc_aborted_batches.load(Ordering::Relaxed),
        }
    }
}
