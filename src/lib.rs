#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Eviction at a Glance
//!
//! ```text
//! add(new_key) on a full map
//!        │
//!        ▼
//! ┌─────────────────────────────┐
//! │ scan usage store            │
//! │ min by (access_count,       │
//! │         last_accessed)      │
//! └──────────────┬──────────────┘
//!                ▼
//!   remove victim from both stores
//!                │
//!                ▼
//!   insert new_key with usage (0, now)
//! ```
//!
//! ## Operation Costs
//!
//! | Operation | Cost | Touches usage |
//! |-----------|------|---------------|
//! | `add` (not full, or overwrite) | O(1) | resets |
//! | `add` (full, new key) | O(n) eviction scan | resets |
//! | `find` | O(1) | increments on hit |
//! | `update` | O(1) | creates if absent |
//! | `delete` | O(1) | removes |
//!
//! The O(n) scan is bounded by `maximum_entries`; the map is meant for small,
//! fixed capacities where a secondary ordered index would cost more than it
//! saves.
//!
//! ## Observability
//!
//! State changes are reported as `tracing` events under the `forgetful_map`
//! target: `info` for added, updated, deleted and evicted entries, `warn` when
//! an `update` grows the map past capacity, `debug` for construction and
//! `clear`. The crate never installs a subscriber.
//!
//! ## Modules
//!
//! - [`forgetful`]: the thread-safe [`ForgetfulMap`]
//! - [`config`]: [`ForgetfulMapConfig`] and capacity validation
//! - [`meta`]: [`UsageMeta`] per-entry usage record
//! - [`clock`]: time sources for usage timestamps
//! - [`metrics`]: operation counters
//! - [`error`]: error types

/// Thread-safe forgetful map.
pub mod forgetful;

/// Map configuration.
pub mod config;

/// Per-entry usage metadata.
pub mod meta;

/// Time sources.
pub mod clock;

/// Operation counters and the common metrics reporting trait.
pub mod metrics;

/// Error types.
pub mod error;

/// Unsynchronized two-store core shared by [`ForgetfulMap`].
pub(crate) mod segment;

#[cfg(feature = "hashbrown")]
pub use hashbrown::{DefaultHashBuilder, HashMap};

#[cfg(not(feature = "hashbrown"))]
pub use std::collections::{hash_map::RandomState as DefaultHashBuilder, HashMap};

pub use config::ForgetfulMapConfig;
pub use error::{ConfigurationError, InvariantError};
pub use forgetful::ForgetfulMap;
pub use meta::UsageMeta;
