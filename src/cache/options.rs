//! Entry Options Module
//!
//! Expiration inputs supplied with a Set and how they resolve into the
//! fields stored on a [`CacheEntry`](super::CacheEntry).

use chrono::{DateTime, Duration, Utc};

use super::entry::saturating_add;

/// Expiration settings for a single Set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryOptions {
    /// Window after the last refresh during which the entry stays live
    pub sliding_expiration: Option<Duration>,
    /// Fixed expiration instant
    pub absolute_expiration: Option<DateTime<Utc>>,
    /// Expiration relative to the moment of the Set; may be negative
    pub absolute_expiration_relative_to_now: Option<Duration>,
}

impl EntryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sliding(mut self, window: Duration) -> Self {
        self.sliding_expiration = Some(window);
        self
    }

    pub fn with_absolute(mut self, at: DateTime<Utc>) -> Self {
        self.absolute_expiration = Some(at);
        self
    }

    pub fn with_absolute_relative_to_now(mut self, offset: Duration) -> Self {
        self.absolute_expiration_relative_to_now = Some(offset);
        self
    }

    // == Resolve Absolute ==
    /// Computes the absolute expiration to persist for a Set at `now`.
    ///
    /// A relative-to-now offset takes precedence over a fixed instant
    /// when both are present. Offsets beyond the representable range
    /// clamp to the earliest or latest instant.
    pub fn resolve_absolute(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut absolute = self.absolute_expiration;
        if let Some(offset) = self.absolute_expiration_relative_to_now {
            absolute = Some(saturating_add(now, offset));
        }
        absolute
    }
}
