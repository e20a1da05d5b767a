//! Fixed-capacity batch summaries with rank bands
//!
//! A [`BatchSummary`] collects up to `capacity` observations. Sorting assigns
//! exact ranks; [`compress`](BatchSummary::compress) keeps a subset of tuples
//! at evenly spaced ranks; [`combine`](BatchSummary::combine) merges two
//! summaries into one whose tuples carry rank bands instead of exact ranks.

mod combine;
mod search;
mod tuple;

pub use search::rank_binary_search;
pub use tuple::RankTuple;

use quant_core::{Error, GrowableBuffer, Observation, QuantileSummary, Result};
use tracing::{debug, instrument};

/// Processing state of a batch summary
///
/// `Compressed` implies sorted: tuples are ordered by value with valid bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SummaryState {
    /// Ranks are not assigned yet
    #[default]
    Unsorted,
    /// Ordered by value with exact ranks `1..=len`
    Sorted,
    /// Ordered by value with rank bands that may be wider than one rank
    Compressed,
}

impl SummaryState {
    /// Whether tuples are ordered and carry valid rank bands
    #[inline]
    pub fn is_sorted(self) -> bool {
        !matches!(self, SummaryState::Unsorted)
    }

    #[inline]
    pub fn is_compressed(self) -> bool {
        matches!(self, SummaryState::Compressed)
    }
}

/// Bounded collection of observations answering rank and quantile queries
///
/// # Example
///
/// ```rust
/// use quant_summary::BatchSummary;
///
/// let mut summary = BatchSummary::new(10).unwrap();
/// for v in [12.3, -1.0, 1.0, 4.0, 2.0] {
///     summary.insert(v).unwrap();
/// }
/// let t = summary.quantile_query(3).unwrap();
/// assert_eq!(t.value, 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct BatchSummary<T> {
    tuples: GrowableBuffer<RankTuple<T>>,
    capacity: usize,
    state: SummaryState,
}

impl<T: Observation> BatchSummary<T> {
    /// Create an empty summary holding at most `capacity` observations
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::zero_sized("batch capacity"));
        }
        Ok(Self {
            tuples: GrowableBuffer::with_capacity(capacity)?,
            capacity,
            state: SummaryState::Unsorted,
        })
    }

    /// Adopt tuples that already carry rank bands
    ///
    /// Values must be non-decreasing, every band must satisfy
    /// `1 <= lower_rank <= upper_rank`, and consecutive bands must not
    /// overlap.
    pub fn from_tuples(tuples: Vec<RankTuple<T>>) -> Result<Self> {
        for (i, t) in tuples.iter().enumerate() {
            Error::check_observation(t.value)?;
            if t.lower_rank == 0 || t.lower_rank > t.upper_rank {
                return Err(Error::InvalidInput(format!(
                    "tuple {i} has invalid rank band [{}, {}]",
                    t.lower_rank, t.upper_rank
                )));
            }
            if i > 0 {
                let prev = &tuples[i - 1];
                if t.value < prev.value {
                    return Err(Error::InvalidInput(format!(
                        "tuple {i} value {:?} is smaller than its predecessor {:?}",
                        t.value, prev.value
                    )));
                }
                if t.lower_rank <= prev.upper_rank {
                    return Err(Error::InvalidInput(format!(
                        "tuple {i} band starts at {} inside the previous band ending at {}",
                        t.lower_rank, prev.upper_rank
                    )));
                }
            }
        }

        let capacity = tuples.len().max(1);
        Ok(Self {
            tuples: GrowableBuffer::from_vec(tuples),
            capacity,
            state: SummaryState::Compressed,
        })
    }

    /// Add an observation; its rank is assigned on the next sort
    pub fn insert(&mut self, value: T) -> Result<()> {
        if self.tuples.len() >= self.capacity {
            return Err(Error::Full {
                capacity: self.capacity,
            });
        }
        Error::check_observation(value)?;
        self.tuples.push(RankTuple::new(value, 0, 0))?;
        self.state = SummaryState::Unsorted;
        Ok(())
    }

    /// Order tuples by value and assign exact ranks
    ///
    /// Does nothing if the summary is already sorted or compressed.
    pub fn sort(&mut self) {
        if self.state.is_sorted() {
            return;
        }
        self.tuples
            .sort_unstable_by(|a, b| a.value.cmp_observation(&b.value));
        for (i, t) in self.tuples.iter_mut().enumerate() {
            let rank = i as u64 + 1;
            t.lower_rank = rank;
            t.upper_rank = rank;
        }
        self.state = SummaryState::Sorted;
    }

    /// Index of the tuple whose rank band contains `rank`
    ///
    /// # Panics
    /// If the summary has not been sorted.
    pub fn rank_binary_search(&self, rank: u64) -> Option<usize> {
        assert!(
            self.state.is_sorted(),
            "rank_binary_search on an unsorted summary"
        );
        rank_binary_search(&self.tuples, rank)
    }

    /// Tuple answering the query for 1-based `rank`, sorting first if needed
    pub fn quantile_query(&mut self, rank: u64) -> Result<RankTuple<T>> {
        self.sort();
        self.locate(rank)
            .map(|i| self.tuples[i])
            .ok_or(Error::NotFound { rank })
    }

    /// Reduce the summary to at most `bins + 1` tuples at evenly spaced ranks
    ///
    /// Targets are `floor(n * i / bins)` for `i = 0..=bins`, clamped to the
    /// covered rank range. On failure the summary is left unchanged.
    #[instrument(skip(self), fields(len = self.tuples.len(), state = ?self.state))]
    pub fn compress(&mut self, bins: usize) -> Result<()> {
        if bins == 0 {
            return Err(Error::zero_sized("compression bin count"));
        }
        self.sort();
        let (Some(first), Some(last)) = (self.tuples.first(), self.tuples.last()) else {
            return Ok(());
        };
        let (min_rank, n) = (first.lower_rank, last.upper_rank);

        let mut kept = GrowableBuffer::with_capacity((bins + 1).min(self.tuples.len()))?;
        let mut last_target = None;
        let mut last_pick = None;
        for i in 0..=bins as u64 {
            let target = ((n as u128 * i as u128) / bins as u128) as u64;
            let target = target.clamp(min_rank, n);
            if last_target == Some(target) {
                continue;
            }
            last_target = Some(target);

            let Some(pick) = self.locate(target) else {
                continue;
            };
            if last_pick == Some(pick) {
                continue;
            }
            last_pick = Some(pick);
            kept.push(self.tuples[pick])?;
        }

        debug!(
            "Compressed batch summary from {} to {} tuples ({} bins)",
            self.tuples.len(),
            kept.len(),
            bins
        );
        self.tuples = kept;
        self.state = SummaryState::Compressed;
        Ok(())
    }

    /// Number of observations represented
    ///
    /// For sorted and compressed summaries this is the last upper rank.
    pub fn count(&self) -> u64 {
        if self.state.is_sorted() {
            self.tuples.last().map_or(0, |t| t.upper_rank)
        } else {
            self.tuples.len() as u64
        }
    }

    /// Number of stored tuples
    #[inline]
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Maximum number of observations accepted by [`insert`](Self::insert)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.tuples.len() >= self.capacity
    }

    #[inline]
    pub fn state(&self) -> SummaryState {
        self.state
    }

    /// Stored tuples in their current order
    #[inline]
    pub fn tuples(&self) -> &[RankTuple<T>] {
        &self.tuples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankTuple<T>> {
        self.tuples.iter()
    }

    /// Largest rank distance a query can fall from a stored tuple
    ///
    /// The maximum of the first upper rank and `upper[i] - lower[i - 1]`
    /// over consecutive tuples. Zero for an empty summary.
    ///
    /// # Panics
    /// If the summary has not been sorted.
    pub fn max_rank_gap(&self) -> u64 {
        assert!(self.state.is_sorted(), "max_rank_gap on an unsorted summary");
        let first = self.tuples.first().map_or(0, |t| t.upper_rank);
        self.tuples
            .windows(2)
            .map(|w| w[1].upper_rank.saturating_sub(w[0].lower_rank))
            .fold(first, u64::max)
    }

    fn locate(&self, rank: u64) -> Option<usize> {
        match self.state {
            SummaryState::Sorted => {
                if rank == 0 || rank > self.tuples.len() as u64 {
                    None
                } else {
                    Some(rank as usize - 1)
                }
            }
            _ => self.rank_binary_search(rank),
        }
    }
}

/// `Sorted` when every band is the exact rank of its position, else `Compressed`
fn banded_state<T>(tuples: &[RankTuple<T>]) -> SummaryState {
    let exact = tuples.iter().enumerate().all(|(i, t)| {
        let rank = i as u64 + 1;
        t.lower_rank == rank && t.upper_rank == rank
    });
    if exact {
        SummaryState::Sorted
    } else {
        SummaryState::Compressed
    }
}

impl<T: Observation> QuantileSummary<T> for BatchSummary<T> {
    fn count(&self) -> u64 {
        BatchSummary::count(self)
    }

    fn quantile(&mut self, q: f64) -> Result<T> {
        Error::check_probability(q)?;
        self.sort();
        let first_rank = match self.tuples.first() {
            Some(t) => t.lower_rank,
            None => return Err(Error::EmptySummary),
        };
        let n = self.count();
        let rank = ((q * n as f64).ceil() as u64).clamp(first_rank.max(1), n);
        self.quantile_query(rank).map(|t| t.value)
    }
}

impl<'a, T> IntoIterator for &'a BatchSummary<T> {
    type Item = &'a RankTuple<T>;
    type IntoIter = std::slice::Iter<'a, RankTuple<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tuples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(values: &[f64], capacity: usize) -> BatchSummary<f64> {
        let mut summary = BatchSummary::new(capacity).unwrap();
        for &v in values {
            summary.insert(v).unwrap();
        }
        summary
    }

    #[test]
    fn test_sort_assigns_exact_ranks() {
        let mut summary = filled(&[12.3, -1.0, 1.0, 4.0, 2.0], 10);
        assert_eq!(summary.state(), SummaryState::Unsorted);
        assert_eq!(summary.count(), 5);

        summary.sort();
        assert_eq!(summary.state(), SummaryState::Sorted);
        let values: Vec<f64> = summary.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![-1.0, 1.0, 2.0, 4.0, 12.3]);

        for rank in 1..=5u64 {
            assert_eq!(summary.rank_binary_search(rank), Some(rank as usize - 1));
            let t = summary.quantile_query(rank).unwrap();
            assert_eq!(t.lower_rank, rank);
            assert_eq!(t.upper_rank, rank);
            assert_eq!(t.value, values[rank as usize - 1]);
        }
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut summary = filled(&[3.0, 1.0, 2.0], 3);
        summary.sort();
        let once = summary.tuples().to_vec();
        summary.sort();
        assert_eq!(summary.tuples(), once.as_slice());
    }

    #[test]
    fn test_insert_after_sort_resets_state() {
        let mut summary = filled(&[3.0, 1.0], 4);
        summary.sort();
        summary.insert(2.0).unwrap();
        assert_eq!(summary.state(), SummaryState::Unsorted);
        assert_eq!(summary.quantile_query(2).unwrap().value, 2.0);
    }

    #[test]
    fn test_insert_full() {
        let mut summary = filled(&[1.0, 2.0], 2);
        assert!(summary.is_full());
        assert_eq!(summary.insert(3.0), Err(Error::Full { capacity: 2 }));
        assert_eq!(summary.len(), 2);
    }

    #[test]
    fn test_insert_rejects_nan() {
        let mut summary = BatchSummary::new(4).unwrap();
        assert!(matches!(summary.insert(f64::NAN), Err(Error::InvalidInput(_))));
        assert!(summary.is_empty());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            BatchSummary::<f64>::new(0),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_quantile_query_out_of_range() {
        let mut summary = filled(&[5.0, 6.0, 7.0], 3);
        assert_eq!(summary.quantile_query(0), Err(Error::NotFound { rank: 0 }));
        assert_eq!(summary.quantile_query(4), Err(Error::NotFound { rank: 4 }));
    }

    #[test]
    #[should_panic(expected = "unsorted")]
    fn test_search_unsorted_panics() {
        let summary = filled(&[2.0, 1.0], 2);
        let _ = summary.rank_binary_search(1);
    }

    #[test]
    fn test_compress_keeps_evenly_spaced_ranks() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        let mut summary = filled(&values, 100);
        summary.compress(10).unwrap();

        assert_eq!(summary.state(), SummaryState::Compressed);
        assert_eq!(summary.len(), 11);
        let ranks: Vec<u64> = summary.iter().map(|t| t.lower_rank).collect();
        assert_eq!(ranks, vec![1, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert_eq!(summary.count(), 100);
        assert_eq!(summary.max_rank_gap(), 10);

        // ranks between kept tuples resolve to the nearer one
        assert_eq!(summary.quantile_query(54).unwrap().value, 50.0);
        assert_eq!(summary.quantile_query(56).unwrap().value, 60.0);
        assert_eq!(summary.quantile_query(8).unwrap().value, 10.0);
    }

    #[test]
    fn test_compress_more_bins_than_tuples() {
        let mut summary = filled(&[3.0, 1.0, 2.0], 3);
        summary.compress(50).unwrap();
        let values: Vec<f64> = summary.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_compress_zero_bins() {
        let mut summary = filled(&[1.0, 2.0], 2);
        assert!(matches!(summary.compress(0), Err(Error::InvalidParameter(_))));
        assert_eq!(summary.state(), SummaryState::Unsorted);
    }

    #[test]
    fn test_compress_empty_is_noop() {
        let mut summary = BatchSummary::<f64>::new(4).unwrap();
        summary.compress(3).unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn test_from_tuples_validation() {
        let ok = BatchSummary::from_tuples(vec![
            RankTuple::new(1.0, 1, 2),
            RankTuple::new(2.0, 3, 5),
        ])
        .unwrap();
        assert_eq!(ok.state(), SummaryState::Compressed);
        assert_eq!(ok.count(), 5);

        let overlapping = BatchSummary::from_tuples(vec![
            RankTuple::new(1.0, 1, 3),
            RankTuple::new(2.0, 3, 5),
        ]);
        assert!(matches!(overlapping, Err(Error::InvalidInput(_))));

        let unordered = BatchSummary::from_tuples(vec![
            RankTuple::new(2.0, 1, 1),
            RankTuple::new(1.0, 2, 2),
        ]);
        assert!(matches!(unordered, Err(Error::InvalidInput(_))));

        let inverted = BatchSummary::from_tuples(vec![RankTuple::new(2.0, 4, 1)]);
        assert!(matches!(inverted, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_quantile_trait() {
        let mut summary = filled(&[10.0, 40.0, 20.0, 30.0], 4);
        assert_eq!(summary.quantile(0.0).unwrap(), 10.0);
        assert_eq!(summary.quantile(0.25).unwrap(), 10.0);
        assert_eq!(summary.quantile(0.5).unwrap(), 20.0);
        assert_eq!(summary.quantile(0.51).unwrap(), 30.0);
        assert_eq!(summary.quantile(1.0).unwrap(), 40.0);
        assert_eq!(summary.median().unwrap(), 20.0);
        assert!(matches!(
            summary.quantile(1.5),
            Err(Error::InvalidProbability { .. })
        ));

        let mut empty = BatchSummary::<f64>::new(2).unwrap();
        assert_eq!(empty.quantile(0.5), Err(Error::EmptySummary));
    }
}
