//! Request DTOs for the cache HTTP API
//!
//! Defines the structure of incoming HTTP request bodies.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::cache::EntryOptions;

/// Request body for storing an entry (PUT /entries/:key)
///
/// # Fields
/// - `value`: The value to store, as UTF-8 text
/// - `sliding_expiration_secs`: Optional sliding window in seconds
/// - `absolute_expiration`: Optional RFC 3339 expiration instant
/// - `absolute_expiration_relative_to_now_secs`: Optional offset from now in
///   seconds; overrides `absolute_expiration` and may be negative
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The value to store
    pub value: String,
    #[serde(default)]
    pub sliding_expiration_secs: Option<i64>,
    #[serde(default)]
    pub absolute_expiration: Option<DateTime<Utc>>,
    #[serde(default)]
    pub absolute_expiration_relative_to_now_secs: Option<i64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if matches!(self.sliding_expiration_secs, Some(secs) if secs <= 0) {
            return Some("Sliding expiration must be positive".to_string());
        }
        None
    }

    /// Converts the request into cache entry options.
    ///
    /// Returns an error message if a seconds field is outside the range a
    /// duration can hold.
    pub fn options(&self) -> Result<EntryOptions, String> {
        Ok(EntryOptions {
            sliding_expiration: seconds(self.sliding_expiration_secs, "sliding_expiration_secs")?,
            absolute_expiration: self.absolute_expiration,
            absolute_expiration_relative_to_now: seconds(
                self.absolute_expiration_relative_to_now_secs,
                "absolute_expiration_relative_to_now_secs",
            )?,
        })
    }
}

fn seconds(secs: Option<i64>, field: &str) -> Result<Option<Duration>, String> {
    secs.map(|s| Duration::try_seconds(s).ok_or_else(|| format!("{} is out of range", field)))
        .transpose()
}
