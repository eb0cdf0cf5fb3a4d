//! Time sources for usage timestamps.
//!
//! The map stamps [`UsageMeta::last_accessed`](crate::meta::UsageMeta) through
//! a [`Clock`] rather than calling `Instant::now()` directly, so tests can pin
//! timestamps and make recency tie-breaks deterministic.
//!
//! ```
//! use forgetful_map::clock::{Clock, ManualClock};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let t0 = clock.now();
//! clock.advance(Duration::from_millis(5));
//! assert_eq!(clock.now() - t0, Duration::from_millis(5));
//! ```

use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A source of monotonic timestamps.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Optionally advances by a fixed step after every reading, which gives each
/// map operation a distinct, strictly increasing timestamp.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: AtomicU64,
    step_nanos: u64,
}

impl ManualClock {
    /// Creates a frozen clock.
    pub fn new() -> Self {
        Self::with_step(Duration::ZERO)
    }

    /// Creates a clock that moves forward by `step` after each reading.
    pub fn with_step(step: Duration) -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: AtomicU64::new(0),
            step_nanos: duration_nanos(step),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.offset_nanos
            .fetch_add(duration_nanos(by), Ordering::SeqCst);
    }

    /// Returns the instant the next reading will produce, without advancing.
    pub fn peek(&self) -> Instant {
        self.origin + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self
            .offset_nanos
            .fetch_add(self.step_nanos, Ordering::SeqCst);
        self.origin + Duration::from_nanos(offset)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    #[inline]
    fn now(&self) -> Instant {
        (**self).now()
    }
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_frozen_until_advanced() {
        let clock = ManualClock::new();
        let a = clock.now();
        let b = clock.now();
        assert_eq!(a, b);

        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now() - a, Duration::from_secs(1));
    }

    #[test]
    fn test_stepping_clock_is_strictly_increasing() {
        let clock = ManualClock::with_step(Duration::from_micros(1));
        let a = clock.now();
        let b = clock.now();
        let c = clock.now();
        assert!(a < b && b < c);
        assert_eq!(clock.peek() - c, Duration::from_micros(1));
    }

    #[test]
    fn test_shared_clock_through_arc() {
        let clock = Arc::new(ManualClock::new());
        let shared = Arc::clone(&clock);
        let before = shared.now();
        clock.advance(Duration::from_millis(3));
        assert_eq!(shared.now() - before, Duration::from_millis(3));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
