//! Configuration for the forgetful map.
//!
//! The map has a single tunable: the maximum number of live entries it holds
//! before `add` starts evicting. The field is public; the struct is
//! validated when a map is built from it.
//!
//! # Examples
//!
//! ```
//! use forgetful_map::config::ForgetfulMapConfig;
//! use forgetful_map::ForgetfulMap;
//!
//! let config = ForgetfulMapConfig { maximum_entries: 100 };
//! let map: ForgetfulMap<String, i32> = ForgetfulMap::init(config).unwrap();
//! assert_eq!(map.capacity().get(), 100);
//!
//! // Raw, possibly missing or negative input is checked up front.
//! assert!(ForgetfulMapConfig::try_from(None::<i64>).is_err());
//! assert!(ForgetfulMapConfig::try_from(-3_i64).is_err());
//! ```

use core::fmt;
use core::num::NonZeroUsize;

use crate::error::ConfigurationError;

/// Largest capacity a map accepts.
pub const MAX_ENTRIES: usize = i32::MAX as usize;

/// Configuration for a [`ForgetfulMap`](crate::ForgetfulMap).
///
/// # Fields
///
/// - `maximum_entries`: number of live keys the map holds before `add`
///   evicts. Must lie in `1..=MAX_ENTRIES`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ForgetfulMapConfig {
    /// Maximum number of entries the map can hold.
    pub maximum_entries: usize,
}

impl ForgetfulMapConfig {
    /// Checks the configured capacity and returns it as a `NonZeroUsize`.
    pub fn validate(&self) -> Result<NonZeroUsize, ConfigurationError> {
        if self.maximum_entries > MAX_ENTRIES {
            return Err(ConfigurationError::OutOfRange {
                requested: self.maximum_entries as i128,
            });
        }
        NonZeroUsize::new(self.maximum_entries)
            .ok_or(ConfigurationError::OutOfRange { requested: 0 })
    }
}

impl TryFrom<i64> for ForgetfulMapConfig {
    type Error = ConfigurationError;

    fn try_from(maximum_entries: i64) -> Result<Self, Self::Error> {
        let out_of_range = ConfigurationError::OutOfRange {
            requested: i128::from(maximum_entries),
        };
        let maximum_entries = usize::try_from(maximum_entries).map_err(|_| out_of_range)?;
        let config = Self { maximum_entries };
        config.validate()?;
        Ok(config)
    }
}

impl TryFrom<Option<i64>> for ForgetfulMapConfig {
    type Error = ConfigurationError;

    fn try_from(maximum_entries: Option<i64>) -> Result<Self, Self::Error> {
        maximum_entries
            .ok_or(ConfigurationError::Missing)
            .and_then(<Self as TryFrom<i64>>::try_from)
    }
}

impl fmt::Debug for ForgetfulMapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForgetfulMapConfig")
            .field("maximum_entries", &self.maximum_entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validate_accepts_bounds() {
        let low = ForgetfulMapConfig { maximum_entries: 1 };
        assert_eq!(low.validate().unwrap().get(), 1);

        let high = ForgetfulMapConfig {
            maximum_entries: MAX_ENTRIES,
        };
        assert_eq!(high.validate().unwrap().get(), MAX_ENTRIES);
    }

    #[test]
    fn test_config_validate_rejects_zero_and_overflow() {
        let zero = ForgetfulMapConfig { maximum_entries: 0 };
        assert_eq!(
            zero.validate(),
            Err(ConfigurationError::OutOfRange { requested: 0 })
        );

        let too_big = ForgetfulMapConfig {
            maximum_entries: MAX_ENTRIES + 1,
        };
        assert_eq!(
            too_big.validate(),
            Err(ConfigurationError::OutOfRange {
                requested: MAX_ENTRIES as i128 + 1
            })
        );
    }

    #[test]
    fn test_config_from_raw_input() {
        assert_eq!(
            ForgetfulMapConfig::try_from(3_i64),
            Ok(ForgetfulMapConfig { maximum_entries: 3 })
        );
        assert_eq!(
            ForgetfulMapConfig::try_from(-1_i64),
            Err(ConfigurationError::OutOfRange { requested: -1 })
        );
        assert_eq!(
            ForgetfulMapConfig::try_from(0_i64),
            Err(ConfigurationError::OutOfRange { requested: 0 })
        );
        assert_eq!(
            ForgetfulMapConfig::try_from(None::<i64>),
            Err(ConfigurationError::Missing)
        );
        assert_eq!(
            ForgetfulMapConfig::try_from(Some(i64::from(i32::MAX))),
            Ok(ForgetfulMapConfig {
                maximum_entries: MAX_ENTRIES
            })
        );
    }
}
