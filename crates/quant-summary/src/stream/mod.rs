//! Greenwald-Khanna streaming summaries
//!
//! Observations are appended to a raw buffer (level 0). When it holds `b`
//! values it is sorted, reduced to about `b / 2` tuples and carried upward:
//! every occupied level `k` absorbs the carry with [`gk_merge`], gets pruned
//! again and is emptied, until the carry lands on an empty level. Level `k`
//! summarises `b * 2^k` observations, so the summary needs
//! `O(log(eps * n) / eps)` tuples per level and `O(log(n / b))` levels.
//!
//! [`StreamingSummary::finish`] consumes the builder and folds every level
//! into a single [`FinishedSummary`] for querying.

mod finished;
pub mod level;
mod tuple;

pub use finished::FinishedSummary;
pub use level::{gk_merge, level_size, merge_values, prune, Level};
pub use tuple::GkTuple;

use quant_core::buffer::DEFAULT_CAPACITY;
use quant_core::{Error, GrowableBuffer, Observation, Result};
use tracing::{debug, instrument};

use crate::config::StreamConfig;

/// Streaming quantile summary with rank error of about `epsilon * n`
///
/// # Example
///
/// ```rust
/// use quant_summary::StreamingSummary;
///
/// let mut stream = StreamingSummary::new(0.01, 10_000).unwrap();
/// for i in 0..10_000u32 {
///     stream.update(f64::from(i)).unwrap();
/// }
/// let summary = stream.finish().unwrap();
/// let median = summary.quantile(0.5).unwrap();
/// assert!((median - 5000.0).abs() <= 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct StreamingSummary<T> {
    config: StreamConfig,
    level_capacity: usize,
    prune_bins: usize,
    count: u64,
    levels: GrowableBuffer<Level<T>>,
}

impl<T: Observation> StreamingSummary<T> {
    /// Create a summary for about `expected_count` observations
    pub fn new(epsilon: f64, expected_count: u64) -> Result<Self> {
        Self::from_config(StreamConfig::new(epsilon, expected_count))
    }

    pub fn from_config(config: StreamConfig) -> Result<Self> {
        let level_capacity = config.level_capacity()?;
        let prune_bins = config.prune_bins()?;

        let mut levels = GrowableBuffer::with_capacity(DEFAULT_CAPACITY)?;
        levels.push(GrowableBuffer::with_capacity(level_capacity)?)?;
        debug!(
            "Streaming summary: epsilon={}, level capacity={}, prune bins={}",
            config.epsilon, level_capacity, prune_bins
        );
        Ok(Self {
            config,
            level_capacity,
            prune_bins,
            count: 0,
            levels,
        })
    }

    /// Add one observation
    ///
    /// On error the observation is not recorded and the summary is unchanged.
    pub fn update(&mut self, value: T) -> Result<()> {
        Error::check_observation(value)?;
        self.levels[0].push(GkTuple::fresh(value))?;
        if self.levels[0].len() >= self.level_capacity {
            if let Err(e) = self.cascade() {
                self.levels[0].pop();
                return Err(e);
            }
        }
        self.count += 1;
        Ok(())
    }

    /// Push the full raw buffer up the level hierarchy
    ///
    /// Every fallible step runs on copies before any level is modified, so a
    /// failed cascade leaves the summary as it was.
    fn cascade(&mut self) -> Result<()> {
        let mut raw = GrowableBuffer::with_capacity(self.levels[0].len())?;
        for &t in self.levels[0].iter() {
            raw.push_unchecked(t);
        }
        raw.sort_unstable_by(|a, b| a.value.cmp_observation(&b.value));
        merge_values(&mut raw);

        let mut carry = prune(&raw, self.prune_bins)?;
        let mut k = 1;
        while k < self.levels.len() && !self.levels[k].is_empty() {
            let weight = self.level_weight(k);
            let merged = gk_merge(&self.levels[k], &carry, self.config.epsilon, weight, weight)?;
            carry = prune(&merged, self.prune_bins)?;
            k += 1;
        }

        if k == self.levels.len() {
            self.levels.push(carry)?;
            debug!("Allocated level {} ({} tuples)", k, self.levels[k].len());
        } else {
            self.levels[k] = carry;
        }
        for level in &mut self.levels[1..k] {
            level.clear();
        }
        self.levels[0].clear();
        debug!("Cascade stored carry at level {}", k);
        Ok(())
    }

    /// Observations summarised by level `k`: `b * 2^k`
    fn level_weight(&self, k: usize) -> u64 {
        let scale = 1u64.checked_shl(k as u32).unwrap_or(u64::MAX);
        (self.level_capacity as u64).saturating_mul(scale)
    }

    /// Consolidate every level into one queryable summary
    ///
    /// The raw buffer is sorted and value-merged, then levels are folded in
    /// increasing order, the accumulator weighted by the observations it
    /// already covers.
    #[instrument(skip(self), fields(count = self.count, levels = self.levels.len()))]
    pub fn finish(self) -> Result<FinishedSummary<T>> {
        let weights: Vec<u64> = (0..self.levels.len()).map(|k| self.level_weight(k)).collect();
        let Self {
            config,
            level_capacity,
            count,
            levels,
            ..
        } = self;

        let mut levels = levels.into_vec().into_iter();
        let mut acc = levels.next().unwrap_or_default();
        acc.sort_unstable_by(|a, b| a.value.cmp_observation(&b.value));
        merge_values(&mut acc);
        let mut acc_weight = level_capacity as u64;

        for (level, weight) in levels.zip(weights.into_iter().skip(1)) {
            if level.is_empty() {
                continue;
            }
            if acc.is_empty() {
                acc = level;
                acc_weight = weight;
                continue;
            }
            acc = gk_merge(&acc, &level, config.epsilon, acc_weight, weight)?;
            acc_weight = acc_weight.saturating_add(weight);
        }

        acc.compact();
        debug!("Finished summary holds {} tuples for {} observations", acc.len(), count);
        Ok(FinishedSummary::new(acc.into_vec(), config.epsilon, count))
    }

    /// Number of observations seen
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    /// Raw buffer capacity `b`
    #[inline]
    pub fn level_capacity(&self) -> usize {
        self.level_capacity
    }

    /// Levels allocated so far, the raw buffer included
    #[inline]
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Tuples currently stored across all levels
    pub fn tuple_count(&self) -> usize {
        self.levels.iter().map(|l| l.len()).sum()
    }

    #[inline]
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }
}
