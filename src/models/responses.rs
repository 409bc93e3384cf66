//! Response DTOs for the cache HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, GcReport};

/// Response body for reading an entry (GET /entries/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value, decoded as UTF-8 (invalid sequences replaced)
    pub value: String,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: &[u8]) -> Self {
        Self {
            key: key.into(),
            value: String::from_utf8_lossy(value).into_owned(),
        }
    }
}

/// Acknowledgement for set, refresh and delete.
#[derive(Debug, Clone, Serialize)]
pub struct KeyResponse {
    /// Success message
    pub message: String,
    /// The key that was affected
    pub key: String,
}

impl KeyResponse {
    /// `action` completes the message, e.g. "set" or "refreshed".
    pub fn new(key: impl Into<String>, action: &str) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' {} successfully", key, action),
            key,
        }
    }
}

/// Response body for a garbage-collection pass (POST /gc)
#[derive(Debug, Clone, Serialize)]
pub struct GcResponse {
    #[serde(flatten)]
    pub report: GcReport,
    pub total_deleted: usize,
}

impl From<GcReport> for GcResponse {
    fn from(report: GcReport) -> Self {
        Self {
            total_deleted: report.total_deleted(),
            report,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Collection the cache writes to
    pub collection: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(collection: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            collection: collection.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
