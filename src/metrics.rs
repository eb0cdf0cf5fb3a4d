//! Map Metrics
//!
//! Counters describing how a [`ForgetfulMap`](crate::ForgetfulMap) has been
//! used. They are updated under the same lock as the stores, so a snapshot is
//! always consistent with the map state at that instant.
//!
//! Metrics are reported as a `BTreeMap<String, f64>` so the output ordering is
//! deterministic across runs.

use std::collections::BTreeMap;

/// Uniform metrics reporting interface.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs, sorted by name.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Short name of the eviction policy, for labelling reports.
    fn algorithm_name(&self) -> &'static str;
}

/// Operation counters for a forgetful map.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ForgetfulMapMetrics {
    /// Number of `find` calls.
    pub requests: u64,
    /// Number of `find` calls that found their key.
    pub hits: u64,
    /// Number of `add` calls.
    pub insertions: u64,
    /// Number of `update` calls.
    pub updates: u64,
    /// Number of `delete` calls that removed a key.
    pub deletions: u64,
    /// Number of entries removed to make room for a new key.
    pub evictions: u64,
    /// Number of `update` calls that pushed the map above its capacity.
    pub capacity_overshoots: u64,
    /// Configured capacity, copied for utilization reporting.
    pub capacity: u64,
}

impl ForgetfulMapMetrics {
    /// Creates zeroed counters for a map of the given capacity.
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.requests += 1;
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.requests += 1;
    }

    pub(crate) fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    pub(crate) fn record_update(&mut self, overshoot: bool) {
        self.updates += 1;
        if overshoot {
            self.capacity_overshoots += 1;
        }
    }

    pub(crate) fn record_deletion(&mut self) {
        self.deletions += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Misses are every request that was not a hit.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.requests - self.hits
    }

    /// Fraction of `find` calls that hit, or 0.0 before any request.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Renders the counters, plus `len` and derived rates, as a sorted map.
    pub fn to_btreemap(&self, len: usize) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("cache_hits".to_string(), self.hits as f64);
        metrics.insert("cache_misses".to_string(), self.misses() as f64);
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("updates".to_string(), self.updates as f64);
        metrics.insert("deletions".to_string(), self.deletions as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert(
            "capacity_overshoots".to_string(),
            self.capacity_overshoots as f64,
        );
        metrics.insert("capacity".to_string(), self.capacity as f64);
        metrics.insert("len".to_string(), len as f64);

        if self.capacity > 0 {
            metrics.insert(
                "utilization".to_string(),
                len as f64 / self.capacity as f64,
            );
        }
        if self.insertions > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.insertions as f64,
            );
        }

        metrics
    }
}
