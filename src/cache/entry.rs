//! Cache Entry Module
//!
//! Defines the stored record and the rule deciding whether it is still live.

use chrono::{DateTime, Duration, Utc};

// == Cache Entry ==
/// A single cache record as persisted in the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The stored value
    pub value: Vec<u8>,
    /// Fixed instant after which the entry is invalid, None = no absolute limit
    pub absolute_expiration: Option<DateTime<Utc>>,
    /// Validity window measured from `last_refresh`, None = no sliding limit
    pub sliding_expiration: Option<Duration>,
    /// Time of the last Set or Refresh
    pub last_refresh: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a fresh entry stamped with `now` as its last refresh.
    pub fn new(
        value: Vec<u8>,
        absolute_expiration: Option<DateTime<Utc>>,
        sliding_expiration: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            value,
            absolute_expiration,
            sliding_expiration,
            last_refresh: now,
        }
    }

    // == Is Valid ==
    /// Checks whether the entry is still live at `now`.
    ///
    /// Both limits are checked independently; a sliding window is not
    /// capped by the absolute expiration. An entry exactly at either
    /// deadline is already invalid.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        if let Some(absolute) = self.absolute_expiration {
            if now >= absolute {
                return false;
            }
        }

        if let Some(sliding) = self.sliding_expiration {
            if now >= saturating_add(self.last_refresh, sliding) {
                return false;
            }
        }

        true
    }

    // == Expires At ==
    /// Returns the earliest deadline of the two limits, or None if the
    /// entry never expires. A sliding deadline past the representable
    /// range counts as no deadline.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let sliding_deadline = self
            .sliding_expiration
            .and_then(|s| self.last_refresh.checked_add_signed(s));
        match (self.absolute_expiration, sliding_deadline) {
            (Some(a), Some(s)) => Some(a.min(s)),
            (a, s) => a.or(s),
        }
    }
}

// == Utility Functions ==
/// Adds `by` to `at`, clamping to the representable range instead of
/// panicking. A deadline clamped to the maximum is never reached.
pub(crate) fn saturating_add(at: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    at.checked_add_signed(by).unwrap_or(if by < Duration::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        absolute: Option<DateTime<Utc>>,
        sliding: Option<Duration>,
        last_refresh: DateTime<Utc>,
    ) -> CacheEntry {
        CacheEntry::new(b"value".to_vec(), absolute, sliding, last_refresh)
    }

    #[test]
    fn test_entry_without_limits_never_expires() {
        let now = Utc::now();
        let e = entry(None, None, now);

        assert!(e.is_valid(now));
        assert!(e.is_valid(now + Duration::days(3650)));
        assert!(e.expires_at().is_none());
    }

    #[test]
    fn test_absolute_expiration_boundary() {
        let now = Utc::now();
        let e = entry(Some(now + Duration::seconds(10)), None, now);

        assert!(e.is_valid(now + Duration::seconds(9)));
        assert!(!e.is_valid(now + Duration::seconds(10)), "expired exactly at deadline");
        assert!(!e.is_valid(now + Duration::seconds(11)));
    }

    #[test]
    fn test_sliding_expiration_boundary() {
        let now = Utc::now();
        let e = entry(None, Some(Duration::seconds(4)), now);

        assert!(e.is_valid(now + Duration::seconds(3)));
        assert!(!e.is_valid(now + Duration::seconds(4)));
    }

    #[test]
    fn test_sliding_measured_from_last_refresh() {
        let start = Utc::now();
        let mut e = entry(None, Some(Duration::seconds(4)), start);

        e.last_refresh = start + Duration::seconds(3);
        assert!(e.is_valid(start + Duration::seconds(6)));
        assert!(!e.is_valid(start + Duration::seconds(7)));
    }

    #[test]
    fn test_both_limits_checked_independently() {
        let now = Utc::now();
        // Absolute hits first
        let e = entry(
            Some(now + Duration::seconds(5)),
            Some(Duration::seconds(60)),
            now,
        );
        assert!(!e.is_valid(now + Duration::seconds(5)));

        // Sliding hits first
        let e = entry(
            Some(now + Duration::seconds(60)),
            Some(Duration::seconds(5)),
            now,
        );
        assert!(!e.is_valid(now + Duration::seconds(5)));
        assert!(e.is_valid(now + Duration::seconds(4)));
    }

    #[test]
    fn test_sliding_not_capped_by_absolute() {
        let now = Utc::now();
        let e = entry(
            Some(now + Duration::seconds(5)),
            Some(Duration::seconds(60)),
            now,
        );

        // The sliding window alone would still be open, but absolute wins.
        assert!(!e.is_valid(now + Duration::seconds(30)));
        assert_eq!(e.expires_at(), Some(now + Duration::seconds(5)));
    }

    #[test]
    fn test_huge_sliding_window_never_expires() {
        let now = Utc::now();
        let e = entry(None, Some(Duration::seconds(10_000_000_000_000)), now);

        assert!(e.is_valid(now));
        assert!(e.is_valid(now + Duration::days(365 * 1000)));
        assert!(e.expires_at().is_none());
    }

    #[test]
    fn test_huge_negative_sliding_window_is_expired() {
        let now = Utc::now();
        let e = entry(None, Some(Duration::seconds(-10_000_000_000_000)), now);
        assert!(!e.is_valid(now));
    }

    #[test]
    fn test_saturating_add_clamps() {
        let now = Utc::now();
        assert_eq!(saturating_add(now, Duration::seconds(5)), now + Duration::seconds(5));
        assert_eq!(
            saturating_add(now, Duration::seconds(10_000_000_000_000)),
            DateTime::<Utc>::MAX_UTC
        );
        assert_eq!(
            saturating_add(now, Duration::seconds(-10_000_000_000_000)),
            DateTime::<Utc>::MIN_UTC
        );
    }

    #[test]
    fn test_expires_at_picks_earliest() {
        let now = Utc::now();
        let e = entry(
            Some(now + Duration::seconds(60)),
            Some(Duration::seconds(5)),
            now,
        );
        assert_eq!(e.expires_at(), Some(now + Duration::seconds(5)));

        let e = entry(None, Some(Duration::seconds(5)), now);
        assert_eq!(e.expires_at(), Some(now + Duration::seconds(5)));
    }
}
