//! Error types for quantile summaries
//!
//! Provides a unified error type for all quant-est crates.

use std::collections::TryReserveError;
use thiserror::Error;

use crate::numeric::Observation;

/// Errors that can occur while building or querying a summary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A batch summary has no room for another observation
    #[error("Summary is full: capacity of {capacity} tuples reached")]
    Full { capacity: usize },

    /// Backing storage could not be allocated
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),

    /// Invalid parameter provided to a constructor or operation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid quantile probability
    #[error("Quantile probability {q} must be in [0, 1]")]
    InvalidProbability { q: f64 },

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The requested rank lies outside every rank band of the summary
    #[error("Rank {rank} is outside the summary's rank bands")]
    NotFound { rank: u64 },

    /// Query against a summary holding no observations
    #[error("Cannot compute quantile of an empty summary")]
    EmptySummary,
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns
impl Error {
    /// Check if probability is valid
    pub fn check_probability(q: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&q) {
            return Err(Error::InvalidProbability { q });
        }
        Ok(())
    }

    /// Check that an error fraction is finite and in (0, 1]
    pub fn check_epsilon(epsilon: f64) -> Result<()> {
        if !epsilon.is_finite() || epsilon <= 0.0 || epsilon > 1.0 {
            return Err(Error::InvalidParameter(format!(
                "epsilon {epsilon} must be in (0, 1]"
            )));
        }
        Ok(())
    }

    /// Reject observations that cannot be ordered (NaN)
    pub fn check_observation<T: Observation>(value: T) -> Result<()> {
        if !value.is_comparable() {
            return Err(Error::InvalidInput(format!(
                "observation {value:?} cannot be ordered"
            )));
        }
        Ok(())
    }

    /// Create an error for a zero-sized capacity or bin count
    pub fn zero_sized(what: &str) -> Self {
        Self::InvalidParameter(format!("{what} must be positive"))
    }
}
