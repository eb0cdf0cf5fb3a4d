//! Per-entry usage metadata.
//!
//! Every live key in a [`ForgetfulMap`](crate::ForgetfulMap) owns exactly one
//! [`UsageMeta`]. The record is created when a key first enters the map,
//! replaced wholesale by `add`, and bumped by every successful `find`.
//!
//! # Eviction Rank
//!
//! Entries are compared by `(access_count, last_accessed)`: the entry with
//! the fewest reads loses, and among equally read entries the one touched
//! longest ago loses.
//!
//! ```
//! use forgetful_map::meta::UsageMeta;
//! use std::time::{Duration, Instant};
//!
//! let t0 = Instant::now();
//! let mut a = UsageMeta::new(t0);
//! let b = UsageMeta::new(t0 + Duration::from_millis(1));
//! assert!(a.eviction_rank() < b.eviction_rank());
//!
//! a.record_access(t0 + Duration::from_millis(2));
//! assert_eq!(a.access_count, 1);
//! assert!(b.eviction_rank() < a.eviction_rank());
//! ```

use std::time::Instant;

/// Usage statistics for one map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageMeta {
    /// Number of successful `find` calls since the record was created.
    pub access_count: u64,
    /// Creation time, or the time of the most recent successful `find`.
    pub last_accessed: Instant,
}

impl UsageMeta {
    /// Creates a fresh record stamped with `now` and no recorded reads.
    #[inline]
    pub fn new(now: Instant) -> Self {
        Self {
            access_count: 0,
            last_accessed: now,
        }
    }

    /// Records one read at `now` and returns the new access count.
    #[inline]
    pub fn record_access(&mut self, now: Instant) -> u64 {
        self.access_count = self.access_count.saturating_add(1);
        self.last_accessed = now;
        self.access_count
    }

    /// Ordering key used to pick eviction victims; smaller is evicted first.
    #[inline]
    pub fn eviction_rank(&self) -> (u64, Instant) {
        (self.access_count, self.last_accessed)
    }
}
