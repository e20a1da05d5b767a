//! Numeric observation trait for quantile summaries
//!
//! Summaries only ever compare and copy observations; they never do
//! arithmetic on them. The trait still requires `num_traits::Num` so that
//! summaries are limited to numeric scalars (integers and floats).

use num_traits::Num;
use std::cmp::Ordering;
use std::fmt::Debug;

/// A raw scalar observation that can be stored in a summary
pub trait Observation: Num + Copy + PartialOrd + Debug + Send + Sync + 'static {
    /// Whether this value takes part in the total order.
    ///
    /// Only floating point NaN fails this check.
    #[inline]
    fn is_comparable(&self) -> bool {
        self.partial_cmp(self).is_some()
    }

    /// Total comparison for values that passed [`is_comparable`](Self::is_comparable)
    #[inline]
    fn cmp_observation(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

impl<T> Observation for T where T: Num + Copy + PartialOrd + Debug + Send + Sync + 'static {}
