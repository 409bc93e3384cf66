//! Doc Cache - A document-store backed distributed cache
//!
//! Key/value entries with absolute and sliding expiration, stored in a
//! document-store collection and swept by an explicit two-phase garbage
//! collector.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{BlockingCache, DistributedCache, EntryOptions, GcReport};
pub use config::{CacheConfig, Config};
pub use error::CacheError;
pub use tasks::spawn_gc_task;
