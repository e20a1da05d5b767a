//! Consolidated result of a streaming summary

use quant_core::{Error, Observation, QuantileSummary, Result};

use super::GkTuple;

/// Read-only summary produced by [`StreamingSummary::finish`](super::StreamingSummary::finish)
///
/// Deserialization checks that the tuples account for exactly `count`
/// observations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "FinishedParts<T>"))]
pub struct FinishedSummary<T> {
    tuples: Vec<GkTuple<T>>,
    epsilon: f64,
    count: u64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct FinishedParts<T> {
    tuples: Vec<GkTuple<T>>,
    epsilon: f64,
    count: u64,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<FinishedParts<T>> for FinishedSummary<T> {
    type Error = Error;

    fn try_from(parts: FinishedParts<T>) -> Result<Self> {
        Error::check_epsilon(parts.epsilon)?;
        let mass = parts
            .tuples
            .iter()
            .try_fold(0u64, |acc, t| acc.checked_add(t.g));
        if mass != Some(parts.count) {
            return Err(Error::InvalidInput(format!(
                "tuples hold {:?} observations but count is {}",
                mass, parts.count
            )));
        }
        Ok(Self {
            tuples: parts.tuples,
            epsilon: parts.epsilon,
            count: parts.count,
        })
    }
}

impl<T: Observation> FinishedSummary<T> {
    pub(crate) fn new(tuples: Vec<GkTuple<T>>, epsilon: f64, count: u64) -> Self {
        Self {
            tuples,
            epsilon,
            count,
        }
    }

    /// Value whose rank lies near `q * count`
    ///
    /// Scans for the tuple whose `g` mass covers rank `floor(q * count)`,
    /// falling back to the largest stored value.
    ///
    /// The rank error stays within `epsilon * count` once `epsilon * count`
    /// reaches a few dozen. Every level prunes to about `b / 2` tuples, so
    /// the error grows like `2 * count / b` with `b = ln(epsilon * count) /
    /// epsilon`; for short streams with `epsilon * count` near 10 it can
    /// reach about `1.5 * epsilon * count`.
    pub fn quantile(&self, q: f64) -> Result<T> {
        Error::check_probability(q)?;
        let last = self.tuples.last().ok_or(Error::EmptySummary)?;

        let rank = (q * self.count as f64).floor() as u64;
        let mut rmin = 0u64;
        for t in &self.tuples {
            if rank < rmin + t.g {
                return Ok(t.value);
            }
            rmin += t.g;
        }
        Ok(last.value)
    }

    pub fn quantiles(&self, qs: &[f64]) -> Result<Vec<T>> {
        qs.iter().map(|&q| self.quantile(q)).collect()
    }

    pub fn median(&self) -> Result<T> {
        self.quantile(0.5)
    }

    /// Smallest observation seen
    pub fn min(&self) -> Option<T> {
        self.tuples.first().map(|t| t.value)
    }

    /// Largest observation seen
    pub fn max(&self) -> Option<T> {
        self.tuples.last().map(|t| t.value)
    }

    /// Number of observations summarised
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[inline]
    pub fn tuples(&self) -> &[GkTuple<T>] {
        &self.tuples
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
}

impl<T: Observation> QuantileSummary<T> for FinishedSummary<T> {
    fn count(&self) -> u64 {
        self.count
    }

    fn quantile(&mut self, q: f64) -> Result<T> {
        FinishedSummary::quantile(self, q)
    }
}
