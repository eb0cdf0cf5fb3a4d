//! Property tests for the forgetful map.
//!
//! Random operation sequences are checked against the invariants that must
//! hold after every step.

use forgetful_map::clock::ManualClock;
use forgetful_map::config::ForgetfulMapConfig;
use forgetful_map::ForgetfulMap;
use proptest::prelude::*;
use std::time::Duration;

fn make_map(cap: usize) -> ForgetfulMap<u8, u32, ManualClock> {
    ForgetfulMap::with_clock(
        ForgetfulMapConfig {
            maximum_entries: cap,
        },
        ManualClock::with_step(Duration::from_micros(1)),
    )
    .unwrap()
}

proptest! {
    /// Property: `add` alone never grows the map past capacity.
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_add_respects_capacity(
        cap in 1usize..8,
        keys in prop::collection::vec(any::<u8>(), 0..200)
    ) {
        let map = make_map(cap);
        for (i, key) in keys.into_iter().enumerate() {
            map.add(key, i as u32);
            prop_assert!(map.len() <= cap);
            prop_assert!(map.contains_key(&key));
        }
    }

    /// Property: stores share one key set after any operation sequence.
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_stores_stay_in_step(
        cap in 1usize..6,
        ops in prop::collection::vec((0u8..4, 0u8..12), 0..150)
    ) {
        let map = make_map(cap);
        for (step, (op, key)) in ops.into_iter().enumerate() {
            match op {
                0 => map.add(key, step as u32),
                1 => { map.find(&key); }
                2 => map.update(key, step as u32),
                _ => map.delete(&key),
            }
            prop_assert!(map.check_invariants().is_ok());

            let mut values: Vec<u8> = map.contents().keys().copied().collect();
            let mut usage: Vec<u8> = map.usage().keys().copied().collect();
            values.sort_unstable();
            usage.sort_unstable();
            prop_assert_eq!(values, usage);
        }
    }

    /// Property: the victim of a full `add` had the minimum usage rank.
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_victim_has_minimum_rank(
        cap in 1usize..6,
        reads in prop::collection::vec(0u8..6, 0..40)
    ) {
        let map = make_map(cap);
        for key in 0..cap as u8 {
            map.add(key, u32::from(key));
        }
        for key in reads {
            map.find(&key);
        }

        let before = map.usage();
        let min_rank = before.values().map(|m| m.eviction_rank()).min().unwrap();

        map.add(u8::MAX, 0);

        let after = map.usage();
        let victims: Vec<u8> = before
            .keys()
            .copied()
            .filter(|k| !after.contains_key(k))
            .collect();
        prop_assert_eq!(victims.len(), 1);
        prop_assert_eq!(before[&victims[0]].eviction_rank(), min_rank);
        for (key, meta) in before.iter().filter(|(k, _)| **k != victims[0]) {
            prop_assert_eq!(after[key], *meta);
        }
    }

    /// Property: N successful finds leave an access count of N.
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_find_count_matches_reads(n in 0u64..50) {
        let map = make_map(2);
        map.add(1, 10);
        for _ in 0..n {
            prop_assert_eq!(map.find(&1), Some(10));
        }
        prop_assert_eq!(map.usage_of(&1).unwrap().access_count, n);
    }
}
