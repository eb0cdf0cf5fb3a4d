//! Forgetful Map Walkthrough
//!
//! Shows eviction order, the `update` capacity asymmetry, and shared use from
//! several threads, with the map's `tracing` events printed to stderr.
//!
//! Run with: RUST_LOG=forgetful_map=info cargo run --example forgetful_demo

use forgetful_map::metrics::CacheMetrics;
use forgetful_map::ForgetfulMap;
use std::sync::Arc;
use std::thread;
use tracing_subscriber::EnvFilter;

fn eviction_order() {
    println!("=== Eviction order ===");
    let map = ForgetfulMap::new(3).unwrap();
    map.add("k1", "one");
    map.add("k2", "two");
    map.add("k3", "three");

    for _ in 0..3 {
        map.find(&"k1");
    }
    for _ in 0..2 {
        map.find(&"k2");
    }
    map.find(&"k3");

    println!("next victim: {:?}", map.eviction_candidate());
    map.add("k4", "four");

    let mut keys: Vec<_> = map.contents().keys().copied().collect();
    keys.sort_unstable();
    println!("after adding k4: {keys:?}");
}

fn update_overshoot() {
    println!("\n=== update never evicts ===");
    let map = ForgetfulMap::new(2).unwrap();
    map.add(1, "a");
    map.add(2, "b");
    map.update(3, "c");
    println!("capacity {} but len {}", map.capacity(), map.len());
}

fn shared_across_threads() {
    println!("\n=== Shared across threads ===");
    let map = Arc::new(ForgetfulMap::new(50).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("t{t}-{i}");
                    map.add(key.clone(), i);
                    if i % 5 == 0 {
                        let _ = map.find(&key);
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().expect("worker panicked");
    }

    println!("len = {}", map.len());
    for (name, value) in map.metrics() {
        println!("  {name}: {value:.2}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    eviction_order();
    update_overshoot();
    shared_across_threads();
}
