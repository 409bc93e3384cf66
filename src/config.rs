//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Name of the collection entries are stored in unless configured otherwise.
pub const DEFAULT_COLLECTION: &str = "Sessions";

/// Number of documents read and deleted per garbage-collection batch.
pub const DEFAULT_PAGE_SIZE: usize = 40;

// == Cache Config ==
/// Settings consumed by [`DistributedCache`](crate::cache::DistributedCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Document-store collection holding the entries
    pub collection: String,
    /// Documents per garbage-collection page
    pub page_size: usize,
    /// Upper bound on pages scanned by the sliding-expiration sweep, None = until done
    pub max_sliding_pages: Option<usize>,
}

impl CacheConfig {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Self::default()
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_sliding_pages: None,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Document-store collection name
    pub collection: String,
    /// HTTP server port
    pub server_port: u16,
    /// Interval in seconds between scheduled garbage-collection passes
    pub gc_interval: u64,
    /// Documents per garbage-collection page
    pub gc_page_size: usize,
    /// Optional bound on sliding-sweep pages per pass
    pub gc_max_sliding_pages: Option<usize>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `COLLECTION_NAME` - Collection holding cache entries (default: Sessions)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `GC_INTERVAL` - Seconds between garbage-collection passes (default: 60)
    /// - `GC_PAGE_SIZE` - Documents per garbage-collection page (default: 40)
    /// - `GC_MAX_SLIDING_PAGES` - Bound on sliding-sweep pages (default: unbounded)
    pub fn from_env() -> Self {
        Self {
            collection: env::var("COLLECTION_NAME")
                .unwrap_or_else(|_| DEFAULT_COLLECTION.to_string()),
            server_port: parse_var("SERVER_PORT").unwrap_or(3000),
            gc_interval: parse_var("GC_INTERVAL").unwrap_or(60),
            gc_page_size: parse_var("GC_PAGE_SIZE").unwrap_or(DEFAULT_PAGE_SIZE),
            gc_max_sliding_pages: parse_var("GC_MAX_SLIDING_PAGES"),
        }
    }

    /// The subset of settings the cache itself needs.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            collection: self.collection.clone(),
            page_size: self.gc_page_size,
            max_sliding_pages: self.gc_max_sliding_pages,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            server_port: 3000,
            gc_interval: 60,
            gc_page_size: DEFAULT_PAGE_SIZE,
            gc_max_sliding_pages: None,
        }
    }
}
