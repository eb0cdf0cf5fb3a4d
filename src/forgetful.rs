//! Thread-Safe Forgetful Map
//!
//! [`ForgetfulMap`] is a bounded key-value store that, once full, forgets the
//! least used entry to make room for a new one. "Least used" means the fewest
//! successful [`find`](ForgetfulMap::find) calls since the entry was last
//! written with [`add`](ForgetfulMap::add); among equally used entries the one
//! read (or created) longest ago goes first.
//!
//! # How It Works
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     ForgetfulMap                     │
//! │                                                      │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │                     Mutex                      │  │
//! │  │  ┌──────────────────────────────────────────┐  │  │
//! │  │  │             ForgetfulSegment             │  │  │
//! │  │  │   content: K → V                         │  │  │
//! │  │  │   usage:   K → (access_count, last_at)   │  │  │
//! │  │  └──────────────────────────────────────────┘  │  │
//! │  └────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation takes the one lock for its whole duration, so the two
//! stores are never observed out of step and an eviction always scans a
//! consistent snapshot. A `RwLock` would buy nothing here: `find` writes the
//! usage store on every hit.
//!
//! # Operations
//!
//! | Operation | Usage record | Capacity check |
//! |-----------|--------------|----------------|
//! | `add`     | reset to `(0, now)` | evicts one entry if full and `key` is new |
//! | `find`    | `+1`, `last_accessed = now` on hit | none |
//! | `update`  | created if `key` is new, otherwise kept | **none** |
//! | `delete`  | removed | none |
//!
//! `update` does not evict. Updating a new key on a full map leaves the map
//! one entry over capacity. `add` only evicts when the map holds exactly
//! `capacity` entries, so on an overshot map new keys keep growing it until
//! deletes bring it back down.
//!
//! # Example
//!
//! ```
//! use forgetful_map::ForgetfulMap;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let map = Arc::new(ForgetfulMap::new(100).unwrap());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let map = Arc::clone(&map);
//!         thread::spawn(move || {
//!             for i in 0..50 {
//!                 map.add(format!("key-{t}-{i}"), i);
//!                 let _ = map.find(&format!("key-{t}-{i}"));
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//! assert_eq!(map.len(), 100);
//! ```

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use std::collections::BTreeMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::ForgetfulMapConfig;
use crate::error::{ConfigurationError, InvariantError};
use crate::meta::UsageMeta;
use crate::metrics::{CacheMetrics, ForgetfulMapMetrics};
use crate::segment::ForgetfulSegment;
use crate::{DefaultHashBuilder, HashMap};

/// A fixed-capacity, thread-safe map that evicts its least used entry.
///
/// # Examples
///
/// ```
/// use forgetful_map::ForgetfulMap;
///
/// let map = ForgetfulMap::new(3).unwrap();
/// map.add("k1", 1);
/// map.add("k2", 2);
/// map.add("k3", 3);
///
/// // Read k1 and k2 so k3 becomes the least used entry.
/// assert_eq!(map.find(&"k1"), Some(1));
/// assert_eq!(map.find(&"k2"), Some(2));
///
/// map.add("k4", 4);
/// assert_eq!(map.find(&"k3"), None);
/// assert_eq!(map.len(), 3);
/// ```
pub struct ForgetfulMap<K, V, C = SystemClock, S = DefaultHashBuilder> {
    segment: Mutex<ForgetfulSegment<K, V, C, S>>,
}

impl<K, V> ForgetfulMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates a map holding at most `maximum_entries` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when `maximum_entries` is zero or above
    /// [`MAX_ENTRIES`](crate::config::MAX_ENTRIES).
    ///
    /// ```
    /// use forgetful_map::ForgetfulMap;
    ///
    /// assert!(ForgetfulMap::<&str, u32>::new(10).is_ok());
    /// assert!(ForgetfulMap::<&str, u32>::new(0).is_err());
    /// ```
    pub fn new(maximum_entries: usize) -> Result<Self, ConfigurationError> {
        Self::init(ForgetfulMapConfig { maximum_entries })
    }

    /// Creates a map from a configuration struct.
    pub fn init(config: ForgetfulMapConfig) -> Result<Self, ConfigurationError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<K, V, C> ForgetfulMap<K, V, C>
where
    K: Hash + Eq + Clone,
    V: Clone,
    C: Clock,
{
    /// Creates a map that stamps usage records with `clock`.
    ///
    /// ```
    /// use forgetful_map::clock::ManualClock;
    /// use forgetful_map::config::ForgetfulMapConfig;
    /// use forgetful_map::ForgetfulMap;
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let clock = Arc::new(ManualClock::new());
    /// let map = ForgetfulMap::with_clock(
    ///     ForgetfulMapConfig { maximum_entries: 2 },
    ///     Arc::clone(&clock),
    /// )
    /// .unwrap();
    ///
    /// map.add("a", 1);
    /// clock.advance(Duration::from_secs(1));
    /// map.find(&"a");
    /// assert_eq!(map.usage_of(&"a").unwrap().last_accessed, clock.peek());
    /// ```
    pub fn with_clock(config: ForgetfulMapConfig, clock: C) -> Result<Self, ConfigurationError> {
        Self::with_hasher(config, clock, DefaultHashBuilder::default())
    }
}

impl<K, V, C, S> ForgetfulMap<K, V, C, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    C: Clock,
    S: BuildHasher + Clone,
{
    /// Creates a map with a custom clock and hash builder for both stores.
    pub fn with_hasher(
        config: ForgetfulMapConfig,
        clock: C,
        hash_builder: S,
    ) -> Result<Self, ConfigurationError> {
        let capacity = config.validate()?;
        debug!(target: "forgetful_map", maximum_entries = capacity.get(), "map created");
        Ok(Self {
            segment: Mutex::new(ForgetfulSegment::with_hasher(capacity, clock, hash_builder)),
        })
    }

    /// Returns the configured maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> NonZeroUsize {
        self.segment.lock().cap()
    }

    /// Returns the number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.lock().is_empty()
    }

    /// Inserts or overwrites `key`, resetting its usage history.
    ///
    /// If the map is full and `key` is not present, the least used entry is
    /// evicted first. Overwriting an existing key never evicts, but its
    /// access count drops back to zero.
    pub fn add(&self, key: K, value: V)
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        self.segment.lock().add(key, value);
    }

    /// Returns a clone of the value for `key`, counting the read.
    ///
    /// Each hit increments the entry's access count and moves its
    /// `last_accessed` to now. A miss changes nothing.
    pub fn find<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().find(key).cloned()
    }

    /// Applies `f` to the value for `key` while holding the lock.
    ///
    /// Counts as a [`find`](Self::find) but avoids cloning the value.
    ///
    /// # Deadlocks
    ///
    /// `f` runs with the map's lock held. Calling any operation on the same
    /// map from inside `f` deadlocks, since the lock is not reentrant.
    pub fn find_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().find(key).map(f)
    }

    /// Writes `value` under `key`, preserving usage history if `key` exists.
    ///
    /// A new key gets a fresh usage record. Unlike [`add`](Self::add), this
    /// never evicts: updating a new key on a full map grows it past capacity.
    pub fn update(&self, key: K, value: V)
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        self.segment.lock().update(key, value);
    }

    /// Removes `key` and its usage record. Missing keys are ignored.
    pub fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + fmt::Debug,
    {
        self.segment.lock().delete(key);
    }

    /// Returns `true` if `key` is present. Does not count as a read.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().contains_key(key)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.segment.lock().clear();
    }

    /// Returns the key the next eviction would remove.
    pub fn eviction_candidate(&self) -> Option<K> {
        self.segment.lock().least_used().cloned()
    }

    /// Returns a snapshot of the value store.
    pub fn contents(&self) -> HashMap<K, V, S> {
        self.segment.lock().contents()
    }

    /// Returns a snapshot of the usage store.
    pub fn usage(&self) -> HashMap<K, UsageMeta, S> {
        self.segment.lock().usage()
    }

    /// Returns the usage record for `key` without counting a read.
    pub fn usage_of<Q>(&self, key: &Q) -> Option<UsageMeta>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().usage_of(key)
    }

    /// Returns a copy of the operation counters.
    pub fn metrics_snapshot(&self) -> ForgetfulMapMetrics {
        self.segment.lock().metrics().clone()
    }

    /// Checks that the value and usage stores hold the same key set.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segment.lock().check_invariants()
    }
}

impl<K, V, C, S> CacheMetrics for ForgetfulMap<K, V, C, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    C: Clock,
    S: BuildHasher + Clone,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        let segment = self.segment.lock();
        segment.metrics().to_btreemap(segment.len())
    }

    fn algorithm_name(&self) -> &'static str {
        "LFU"
    }
}

impl<K, V, C, S> fmt::Debug for ForgetfulMap<K, V, C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.segment.try_lock() {
            Some(segment) => f
                .debug_struct("ForgetfulMap")
                .field("segment", &*segment)
                .finish(),
            None => f
                .debug_struct("ForgetfulMap")
                .field("segment", &"<locked>")
                .finish(),
        }
    }
}
