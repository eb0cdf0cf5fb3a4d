//! Unsynchronized forgetful map core.
//!
//! [`ForgetfulSegment`] owns the two parallel stores, a value store and a
//! usage store, and implements every operation on them. It takes `&mut self`
//! throughout and does no locking of its own; [`ForgetfulMap`] wraps a single
//! segment in one mutex so that each operation, including the eviction scan,
//! runs to completion before the next one starts.
//!
//! # Store Invariant
//!
//! Both stores always hold the same key set. Methods that write one store
//! write the other before returning.
//!
//! # Eviction
//!
//! Eviction is a linear scan over the usage store for the smallest
//! `(access_count, last_accessed)` pair. Capacities are expected to be small,
//! so no secondary ordered index is kept. Entries whose count and timestamp
//! are both equal are ordered by the usage store's iteration order, which is
//! unspecified.
//!
//! [`ForgetfulMap`]: crate::ForgetfulMap

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;

use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::InvariantError;
use crate::meta::UsageMeta;
use crate::metrics::ForgetfulMapMetrics;
use crate::HashMap;

/// Upper bound on the slots reserved up front; larger maps grow on demand.
const PREALLOCATION_LIMIT: usize = 1024;

/// An entry removed by the eviction scan, with its final usage record.
pub(crate) type Evicted<K, V> = (K, V, UsageMeta);

pub(crate) struct ForgetfulSegment<K, V, C, S> {
    /// Number of live keys `add` keeps the map at or below.
    capacity: NonZeroUsize,

    /// Value store: key to caller value.
    content: HashMap<K, V, S>,

    /// Usage store: key to access statistics. Same key set as `content`.
    usage: HashMap<K, UsageMeta, S>,

    clock: C,

    metrics: ForgetfulMapMetrics,
}

impl<K, V, C, S> ForgetfulSegment<K, V, C, S>
where
    K: Hash + Eq + Clone,
    C: Clock,
    S: BuildHasher + Clone,
{
    pub(crate) fn with_hasher(capacity: NonZeroUsize, clock: C, hash_builder: S) -> Self {
        let reserved = capacity.get().min(PREALLOCATION_LIMIT);
        ForgetfulSegment {
            capacity,
            content: HashMap::with_capacity_and_hasher(reserved, hash_builder.clone()),
            usage: HashMap::with_capacity_and_hasher(reserved, hash_builder),
            clock,
            metrics: ForgetfulMapMetrics::new(capacity.get() as u64),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.content.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &ForgetfulMapMetrics {
        &self.metrics
    }

    /// Inserts or overwrites `key`, always with a fresh usage record.
    ///
    /// A genuinely new key arriving while the map holds exactly `capacity`
    /// entries first evicts the least used entry, which is returned. A map
    /// already pushed past capacity by `update` does not evict here.
    pub(crate) fn add(&mut self, key: K, value: V) -> Option<Evicted<K, V>>
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        let evicted = if self.len() == self.capacity.get() && !self.content.contains_key(&key) {
            self.evict_least_used()
        } else {
            None
        };

        info!(target: "forgetful_map", key = ?key, value = ?value, "entry added");

        let meta = UsageMeta::new(self.clock.now());
        self.content.insert(key.clone(), value);
        self.usage.insert(key, meta);
        self.metrics.record_insertion();

        evicted
    }

    /// Looks up `key`, counting the read against its usage record.
    pub(crate) fn find<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.usage.get_mut(key) {
            Some(meta) => {
                meta.record_access(self.clock.now());
                self.metrics.record_hit();
            }
            None => self.metrics.record_miss(),
        }

        let value = self.content.get(key);
        debug_assert_eq!(value.is_some(), self.usage.contains_key(key));
        value
    }

    /// Writes `value` under `key`, keeping existing usage untouched.
    ///
    /// A key that was absent gets a fresh usage record. No eviction is run,
    /// so updating a new key on a full map leaves it one entry over capacity.
    /// Returns `true` when that happened.
    pub(crate) fn update(&mut self, key: K, value: V) -> bool
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        let is_new = !self.content.contains_key(&key);
        if is_new {
            self.usage
                .insert(key.clone(), UsageMeta::new(self.clock.now()));
        }

        info!(target: "forgetful_map", key = ?key, value = ?value, "entry updated");
        self.content.insert(key, value);

        let overshoot = is_new && self.len() > self.capacity.get();
        if overshoot {
            warn!(
                target: "forgetful_map",
                len = self.len(),
                capacity = self.capacity.get(),
                "update inserted a new key past capacity"
            );
        }
        self.metrics.record_update(overshoot);
        overshoot
    }

    /// Removes `key` from both stores, returning its value if it was present.
    pub(crate) fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + fmt::Debug,
    {
        let removed = self.content.remove(key);
        self.usage.remove(key);

        if removed.is_some() {
            self.metrics.record_deletion();
        }
        info!(target: "forgetful_map", key = ?key, present = removed.is_some(), "entry deleted");

        removed
    }

    pub(crate) fn clear(&mut self) {
        debug!(target: "forgetful_map", len = self.len(), "clearing map");
        self.content.clear();
        self.usage.clear();
    }

    #[inline]
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.content.contains_key(key)
    }

    /// The key the next eviction would remove, if any.
    pub(crate) fn least_used(&self) -> Option<&K> {
        self.usage
            .iter()
            .min_by_key(|(_, meta)| meta.eviction_rank())
            .map(|(key, _)| key)
    }

    fn evict_least_used(&mut self) -> Option<Evicted<K, V>>
    where
        K: fmt::Debug,
    {
        let victim = self.least_used()?.clone();
        let meta = self.usage.remove(&victim)?;
        let value = self.content.remove(&victim);
        debug_assert!(value.is_some(), "usage record without a value");
        let value = value?;

        self.metrics.record_eviction();
        info!(
            target: "forgetful_map",
            key = ?victim,
            access_count = meta.access_count,
            "map capacity limit reached, removing least used entry"
        );

        Some((victim, value, meta))
    }

    pub(crate) fn contents(&self) -> HashMap<K, V, S>
    where
        V: Clone,
    {
        self.content.clone()
    }

    pub(crate) fn usage(&self) -> HashMap<K, UsageMeta, S> {
        self.usage.clone()
    }

    pub(crate) fn usage_of<Q>(&self, key: &Q) -> Option<UsageMeta>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.usage.get(key).copied()
    }

    /// Verifies that the value store and usage store hold the same keys.
    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.content.len() != self.usage.len() {
            return Err(InvariantError::new(format!(
                "value store holds {} keys but usage store holds {}",
                self.content.len(),
                self.usage.len()
            )));
        }
        if self.content.keys().any(|key| !self.usage.contains_key(key)) {
            return Err(InvariantError::new("value store key has no usage record"));
        }
        Ok(())
    }
}

impl<K, V, C, S> fmt::Debug for ForgetfulSegment<K, V, C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForgetfulSegment")
            .field("capacity", &self.capacity)
            .field("len", &self.content.len())
            .finish()
    }
}
