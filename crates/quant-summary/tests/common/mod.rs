//! Shared utilities for integration tests

#![allow(dead_code)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

pub const SEED: u64 = 42;

/// Install a tracing subscriber honouring `RUST_LOG`; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A deterministic permutation of `0..n` (`n` must not be a multiple of 7919)
pub fn permutation(n: u64) -> Vec<u64> {
    (0..n).map(|i| (i * 7919) % n).collect()
}

/// Shuffled `0..n` from a seeded generator
pub fn shuffled(n: u64, seed: u64) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut values: Vec<u64> = (0..n).collect();
    values.shuffle(&mut rng);
    values
}

/// Seeded gaussian sample
pub fn gaussian(n: usize, mean: f64, std_dev: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(mean, std_dev).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

/// Smallest distance between `rank` and any 0-based position of `value` in `sorted`
pub fn rank_error<T: PartialOrd>(sorted: &[T], value: T, rank: usize) -> usize {
    let lo = sorted.partition_point(|v| *v < value);
    let hi = sorted.partition_point(|v| *v <= value);
    assert!(lo < hi, "returned value was never observed");
    if rank < lo {
        lo - rank
    } else if rank >= hi {
        rank - (hi - 1)
    } else {
        0
    }
}
