//! Core traits for querying quantile summaries

use crate::numeric::Observation;
use crate::Result;

/// Query surface shared by every summary kind
///
/// Queries take `&mut self` because batch summaries sort lazily on first
/// query.
pub trait QuantileSummary<T: Observation> {
    /// Number of observations the summary represents
    fn count(&self) -> u64;

    /// Approximate value at quantile `q` in [0, 1]
    fn quantile(&mut self, q: f64) -> Result<T>;

    /// Approximate values at several quantiles
    fn quantiles(&mut self, qs: &[f64]) -> Result<Vec<T>> {
        qs.iter().map(|&q| self.quantile(q)).collect()
    }

    /// Approximate median
    fn median(&mut self) -> Result<T> {
        self.quantile(0.5)
    }

    /// Check if summary is empty
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}
