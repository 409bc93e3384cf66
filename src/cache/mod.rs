//! Cache Module
//!
//! Document-store backed caching with absolute and sliding expiration.

mod blocking;
mod collector;
mod entry;
mod options;
mod service;
mod stats;


// Re-export public types
pub use blocking::BlockingCache;
pub use collector::GcReport;
pub use entry::CacheEntry;
pub use options::EntryOptions;
pub use service::DistributedCache;
pub use stats::CacheStats;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 1500;
