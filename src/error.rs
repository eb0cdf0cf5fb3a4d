//! Error types for the forgetful map.
//!
//! - [`ConfigurationError`]: returned when a map is constructed with an
//!   invalid `maximum_entries`. This is the only error a map operation can
//!   produce; lookups and deletes of missing keys are not errors.
//! - [`InvariantError`]: returned by
//!   [`ForgetfulMap::check_invariants`](crate::ForgetfulMap::check_invariants)
//!   when the value store and the usage store disagree.
//!
//! # Example
//!
//! ```
//! use forgetful_map::{ConfigurationError, ForgetfulMap};
//!
//! let err = ForgetfulMap::<u32, u32>::new(0).unwrap_err();
//! assert_eq!(err, ConfigurationError::OutOfRange { requested: 0 });
//! assert_eq!(
//!     err.to_string(),
//!     "maximum entries must be between 1 and 2147483647"
//! );
//! ```

use thiserror::Error;

use crate::config::MAX_ENTRIES;

/// Error returned when a map's capacity is missing or out of range.
///
/// Every variant renders the same fixed message naming the valid range, so
/// callers can match on the variant for the cause and still show a stable
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No capacity was supplied.
    #[error("maximum entries must be between 1 and {max}", max = MAX_ENTRIES)]
    Missing,
    /// The requested capacity is zero, negative or above [`MAX_ENTRIES`].
    #[error("maximum entries must be between 1 and {max}", max = MAX_ENTRIES)]
    OutOfRange {
        /// The rejected value.
        requested: i128,
    },
}

/// Error returned when the map's internal stores are found inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("forgetful map invariant violated: {0}")]
pub struct InvariantError(String);

impl InvariantError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the description of the failed invariant.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}
