//! Rank-banded tuples stored by batch summaries

use quant_core::Observation;

/// An observation together with the band of 1-based ranks it may occupy
///
/// Exact tuples have `lower_rank == upper_rank`. Tuples inserted but not yet
/// sorted carry ranks of zero until the summary is sorted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankTuple<T> {
    pub value: T,
    pub lower_rank: u64,
    pub upper_rank: u64,
}

impl<T: Observation> RankTuple<T> {
    /// Create a tuple with an explicit rank band
    pub fn new(value: T, lower_rank: u64, upper_rank: u64) -> Self {
        Self {
            value,
            lower_rank,
            upper_rank,
        }
    }

    /// Create a tuple whose rank is known exactly
    pub fn exact(value: T, rank: u64) -> Self {
        Self::new(value, rank, rank)
    }

    /// Width of the rank band
    #[inline]
    pub fn width(&self) -> u64 {
        self.upper_rank.saturating_sub(self.lower_rank)
    }

    /// Whether the band covers exactly one rank
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.lower_rank == self.upper_rank
    }

    /// Whether `rank` falls inside the band
    #[inline]
    pub fn contains(&self, rank: u64) -> bool {
        self.lower_rank <= rank && rank <= self.upper_rank
    }
}
