//! Document Store Module
//!
//! The capabilities the cache needs from its backing document store:
//! point reads and writes, a partial update, guarded deletes, ordered
//! range queries and an atomic multi-delete commit.

mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::cache::CacheEntry;

pub use memory::MemoryStore;

/// Last-modification marker of a stored document. Every write bumps it.
pub type Revision = u64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A stored entry together with its key and revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub key: String,
    pub entry: CacheEntry,
    pub revision: Revision,
}

/// Sort order (and filter) of a sweep query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOrder {
    /// Documents with `absolute_expiration <= cutoff`, latest expiration first.
    AbsoluteExpiredDesc { cutoff: DateTime<Utc> },
    /// Every document, least recently refreshed first.
    LastRefreshAsc,
}

/// Position after which a query resumes: the sort value and key of the
/// last document already seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepCursor {
    pub sort_value: DateTime<Utc>,
    pub key: String,
}

impl SweepCursor {
    /// Builds the cursor for `doc` under `order`, or None when the
    /// document carries no value for the ordered field.
    pub fn after(order: &SweepOrder, doc: &Document) -> Option<Self> {
        let sort_value = match order {
            SweepOrder::AbsoluteExpiredDesc { .. } => doc.entry.absolute_expiration?,
            SweepOrder::LastRefreshAsc => doc.entry.last_refresh,
        };
        Some(Self {
            sort_value,
            key: doc.key.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepQuery {
    pub order: SweepOrder,
    pub start_after: Option<SweepCursor>,
    pub limit: usize,
}

/// A delete that only applies if the document still has `expected_revision`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedDelete {
    pub key: String,
    pub expected_revision: Revision,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError>;

    /// Writes `entry` as a full replacement of any existing document.
    async fn put(&self, collection: &str, key: &str, entry: CacheEntry) -> Result<(), StoreError>;

    /// Partial update of `last_refresh` only. Fails with `NotFound` when
    /// the document does not exist.
    async fn update_last_refresh(
        &self,
        collection: &str,
        key: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Unconditional delete; deleting a missing document is not an error.
    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError>;

    async fn query(&self, collection: &str, query: &SweepQuery)
        -> Result<Vec<Document>, StoreError>;

    /// Applies every delete or none. Fails with `PreconditionFailed` if
    /// any target is gone or has moved past its expected revision.
    async fn commit_deletes(
        &self,
        collection: &str,
        deletes: &[GuardedDelete],
    ) -> Result<(), StoreError>;
}
