//! Garbage Collector Module
//!
//! Physically removes expired entries from the document store in two
//! phases:
//!
//! 1. Absolute sweep: the store filters on `absolute_expiration <= now`,
//!    so every returned document is deleted.
//! 2. Sliding sweep: `last_refresh + sliding_expiration` cannot be range
//!    filtered, so documents are scanned oldest-refresh first and checked
//!    client-side.
//!
//! Each page is committed as one batch of revision-guarded deletes. If any
//! document in the page changed after it was read, the store rejects the
//! whole batch and the survivors are left for the next pass.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{CacheError, Result};
use crate::store::{
    Document, DocumentStore, GuardedDelete, StoreError, SweepCursor, SweepOrder, SweepQuery,
};

// == GC Report ==
/// Outcome of one garbage-collection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GcReport {
    /// Entries deleted by the absolute-expiration sweep
    pub absolute_deleted: usize,
    /// Entries deleted by the sliding-expiration sweep
    pub sliding_deleted: usize,
    /// Batches rejected because a document changed after it was read
    pub aborted_batches: usize,
    /// Pages read across both phases
    pub pages: usize,
}

impl GcReport {
    pub fn total_deleted(&self) -> usize {
        self.absolute_deleted + self.sliding_deleted
    }
}

// == Garbage Collector ==
pub(crate) struct GarbageCollector {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    collection: String,
    page_size: usize,
    max_sliding_pages: Option<usize>,
}

impl GarbageCollector {
    pub(crate) fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        collection: String,
        page_size: usize,
        max_sliding_pages: Option<usize>,
    ) -> Self {
        Self {
            store,
            clock,
            collection,
            page_size,
            max_sliding_pages,
        }
    }

    /// Runs both sweeps against a single `now` taken at the start of the pass.
    ///
    /// Pages committed before a cancellation or store failure stay committed.
    pub(crate) async fn collect(&self, cancel: &CancellationToken) -> Result<GcReport> {
        let now = self.clock.now();
        let mut report = GcReport::default();

        self.sweep_absolute(now, cancel, &mut report).await?;
        self.sweep_sliding(now, cancel, &mut report).await?;

        info!(
            collection = %self.collection,
            absolute_deleted = report.absolute_deleted,
            sliding_deleted = report.sliding_deleted,
            aborted_batches = report.aborted_batches,
            pages = report.pages,
            "Garbage collection pass complete"
        );
        Ok(report)
    }

    // == Phase 1 ==
    async fn sweep_absolute(
        &self,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
        report: &mut GcReport,
    ) -> Result<()> {
        let mut query = SweepQuery {
            order: SweepOrder::AbsoluteExpiredDesc { cutoff: now },
            start_after: None,
            limit: self.page_size,
        };

        loop {
            let page = self.fetch_page(&query, cancel, report).await?;
            let deletes: Vec<GuardedDelete> = page.iter().map(guard).collect();
            let deleted = self.commit(&deletes, cancel, report).await?;
            report.absolute_deleted += deleted;

            if page.len() < self.page_size {
                return Ok(());
            }
            query.start_after = page.last().and_then(|doc| SweepCursor::after(&query.order, doc));
        }
    }

    // == Phase 2 ==
    async fn sweep_sliding(
        &self,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
        report: &mut GcReport,
    ) -> Result<()> {
        let mut query = SweepQuery {
            order: SweepOrder::LastRefreshAsc,
            start_after: None,
            limit: self.page_size,
        };
        let mut pages = 0;

        loop {
            if self.max_sliding_pages.is_some_and(|max| pages >= max) {
                debug!(pages, "Sliding sweep reached its page bound");
                return Ok(());
            }

            let page = self.fetch_page(&query, cancel, report).await?;
            pages += 1;

            let deletes: Vec<GuardedDelete> = page
                .iter()
                .filter(|doc| !doc.entry.is_valid(now))
                .map(guard)
                .collect();
            let deleted = self.commit(&deletes, cancel, report).await?;
            report.sliding_deleted += deleted;

            // A page with nothing expired ends the sweep, even if expired
            // entries with shorter windows sit further along.
            if deletes.is_empty() || page.len() < self.page_size {
                return Ok(());
            }
            query.start_after = page.last().and_then(|doc| SweepCursor::after(&query.order, doc));
        }
    }

    async fn fetch_page(
        &self,
        query: &SweepQuery,
        cancel: &CancellationToken,
        report: &mut GcReport,
    ) -> Result<Vec<Document>> {
        let page = cancellable(cancel, self.store.query(&self.collection, query)).await?;
        report.pages += 1;
        Ok(page)
    }

    /// Commits one page of deletes and returns how many were applied.
    /// A precondition failure aborts only this batch.
    async fn commit(
        &self,
        deletes: &[GuardedDelete],
        cancel: &CancellationToken,
        report: &mut GcReport,
    ) -> Result<usize> {
        if deletes.is_empty() {
            return Ok(0);
        }

        match cancellable(cancel, self.store.commit_deletes(&self.collection, deletes)).await {
            Ok(()) => {
                debug!(deleted = deletes.len(), "Committed garbage-collection batch");
                Ok(deletes.len())
            }
            Err(CacheError::Store(StoreError::PreconditionFailed(key))) => {
                warn!(
                    key = %key,
                    batch = deletes.len(),
                    "Garbage-collection batch aborted, entry changed since it was read"
                );
                report.aborted_batches += 1;
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }
}

fn guard(doc: &Document) -> GuardedDelete {
    GuardedDelete {
        key: doc.key.clone(),
        expected_revision: doc.revision,
    }
}

async fn cancellable<T, F>(cancel: &CancellationToken, call: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, StoreError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CacheError::Cancelled),
        result = call => Ok(result?),
    }
}
