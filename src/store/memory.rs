//! In-Memory Document Store
//!
//! A [`DocumentStore`] held entirely in process memory. Each collection is
//! a map of key to document; a single mutex makes every operation,
//! including batch commits, atomic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::{Document, DocumentStore, GuardedDelete, Revision, StoreError, SweepOrder, SweepQuery};
use crate::cache::CacheEntry;

#[derive(Debug, Default)]
struct Inner {
    collections: HashMap<String, HashMap<String, Document>>,
    next_revision: Revision,
}

impl Inner {
    fn bump(&mut self) -> Revision {
        self.next_revision += 1;
        self.next_revision
    }
}

// == Memory Store ==
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents physically stored in `collection`, expired or not.
    pub fn len(&self, collection: &str) -> usize {
        self.inner
            .lock()
            .collections
            .get(collection)
            .map_or(0, HashMap::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Simulates losing the connection: every call fails with
    /// `StoreError::Unavailable` until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

fn sort_value(order: &SweepOrder, doc: &Document) -> Option<DateTime<Utc>> {
    match order {
        SweepOrder::AbsoluteExpiredDesc { cutoff } => doc
            .entry
            .absolute_expiration
            .filter(|absolute| absolute <= cutoff),
        SweepOrder::LastRefreshAsc => Some(doc.entry.last_refresh),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        self.check_online()?;
        let inner = self.inner.lock();
        Ok(inner
            .collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn put(&self, collection: &str, key: &str, entry: CacheEntry) -> Result<(), StoreError> {
        self.check_online()?;
        let mut inner = self.inner.lock();
        let revision = inner.bump();
        inner.collections.entry(collection.to_string()).or_default().insert(
            key.to_string(),
            Document {
                key: key.to_string(),
                entry,
                revision,
            },
        );
        Ok(())
    }

    async fn update_last_refresh(
        &self,
        collection: &str,
        key: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        let mut inner = self.inner.lock();
        let revision = inner.bump();
        let doc = inner
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(key))
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        doc.entry.last_refresh = at;
        doc.revision = revision;
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        self.check_online()?;
        let mut inner = self.inner.lock();
        if let Some(docs) = inner.collections.get_mut(collection) {
            docs.remove(key);
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        query: &SweepQuery,
    ) -> Result<Vec<Document>, StoreError> {
        self.check_online()?;
        let inner = self.inner.lock();
        let Some(docs) = inner.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut candidates: Vec<(DateTime<Utc>, &Document)> = docs
            .values()
            .filter_map(|doc| sort_value(&query.order, doc).map(|value| (value, doc)))
            .collect();

        let descending = matches!(query.order, SweepOrder::AbsoluteExpiredDesc { .. });
        candidates.sort_by(|(a, da), (b, db)| {
            let ord = a.cmp(b).then_with(|| da.key.cmp(&db.key));
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });

        let page = candidates
            .into_iter()
            .filter(|(value, doc)| match &query.start_after {
                None => true,
                Some(cursor) => {
                    let position = (*value, doc.key.as_str());
                    let start = (cursor.sort_value, cursor.key.as_str());
                    if descending {
                        position < start
                    } else {
                        position > start
                    }
                }
            })
            .take(query.limit)
            .map(|(_, doc)| doc.clone())
            .collect();

        Ok(page)
    }

    async fn commit_deletes(
        &self,
        collection: &str,
        deletes: &[GuardedDelete],
    ) -> Result<(), StoreError> {
        self.check_online()?;
        let mut inner = self.inner.lock();
        let Some(docs) = inner.collections.get_mut(collection) else {
            return match deletes.first() {
                Some(delete) => Err(StoreError::PreconditionFailed(delete.key.clone())),
                None => Ok(()),
            };
        };

        for delete in deletes {
            match docs.get(&delete.key) {
                Some(doc) if doc.revision == delete.expected_revision => {}
                _ => return Err(StoreError::PreconditionFailed(delete.key.clone())),
            }
        }

        for delete in deletes {
            docs.remove(&delete.key);
        }
        Ok(())
    }
}
