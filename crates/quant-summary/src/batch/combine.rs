//! Merging two batch summaries into one with widened rank bands

use quant_core::{GrowableBuffer, Observation, Result};
use tracing::{debug, instrument};

use super::{banded_state, BatchSummary, RankTuple};

impl<T: Observation> BatchSummary<T> {
    /// Merge two summaries, consuming both
    ///
    /// Tuples are interleaved by ascending value, ties taking `a` first. A
    /// tuple's band is shifted by the other summary's neighbours: its lower
    /// rank grows by the lower rank of the nearest preceding tuple from the
    /// other side, its upper rank by the upper rank of the nearest following
    /// tuple from the other side minus one (or by that side's total when no
    /// such tuple exists).
    ///
    /// The result has capacity `a.len() + b.len()`.
    #[instrument(skip(a, b), fields(len_a = a.len(), len_b = b.len()))]
    pub fn combine(mut a: Self, mut b: Self) -> Result<Self> {
        a.sort();
        b.sort();
        let (xs, ys) = (a.tuples(), b.tuples());
        let capacity = xs.len() + ys.len();
        let mut merged = GrowableBuffer::with_capacity(capacity)?;

        let (mut i, mut j) = (0, 0);
        while i < xs.len() || j < ys.len() {
            let take_a = j == ys.len() || (i < xs.len() && xs[i].value <= ys[j].value);
            let tuple = if take_a {
                i += 1;
                shift_band(&xs[i - 1], ys, j)
            } else {
                j += 1;
                shift_band(&ys[j - 1], xs, i)
            };
            merged.push_unchecked(tuple);
        }

        let state = banded_state(&merged);
        debug!(
            "Combined {} and {} tuples into {} ({:?})",
            xs.len(),
            ys.len(),
            merged.len(),
            state
        );
        Ok(Self {
            tuples: merged,
            capacity,
            state,
        })
    }
}

/// Band of `tuple` once the other summary's tuples are merged around it
///
/// `next` is the index of the first tuple in `other` not yet emitted.
fn shift_band<T: Observation>(
    tuple: &RankTuple<T>,
    other: &[RankTuple<T>],
    next: usize,
) -> RankTuple<T> {
    let preceding = match next {
        0 => 0,
        _ => other[next - 1].lower_rank,
    };
    let following = match other.get(next) {
        Some(t) => t.upper_rank.saturating_sub(1),
        None => other.last().map_or(0, |t| t.upper_rank),
    };
    RankTuple::new(
        tuple.value,
        tuple.lower_rank + preceding,
        tuple.upper_rank + following,
    )
}
