//! Shared utilities for end-to-end tests

#![allow(dead_code)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Normal};

pub const SEED: u64 = 0x5eed;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Seeded gaussian sample
pub fn normal_data(n: usize, mean: f64, std_dev: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(mean, std_dev).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

/// Seeded right-skewed sample, the shape of typical latency data
pub fn exponential_data(n: usize, rate: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let exp = Exp::new(rate).unwrap();
    (0..n).map(|_| exp.sample(&mut rng)).collect()
}

/// Exact value at 0-based rank `floor(q * n)`, clamped to the last element
pub fn exact_quantile(sorted: &[f64], q: f64) -> f64 {
    let idx = ((q * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);
    sorted[idx]
}

/// Fraction of `sorted` strictly below `value`, and at or below it
pub fn rank_fraction(sorted: &[f64], value: f64) -> (f64, f64) {
    let n = sorted.len() as f64;
    let below = sorted.partition_point(|v| *v < value) as f64;
    let at_or_below = sorted.partition_point(|v| *v <= value) as f64;
    (below / n, at_or_below / n)
}
