//! Configuration for streaming summaries

use quant_core::{Error, Result};

/// Parameters of a [`StreamingSummary`](crate::StreamingSummary)
///
/// `epsilon` is the tolerated rank error as a fraction of the stream length.
/// `expected_count` is an estimate of how many observations will arrive; it
/// only sizes the levels and is not a hard limit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamConfig {
    pub epsilon: f64,
    pub expected_count: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.01,
            expected_count: 1_000_000,
        }
    }
}

impl StreamConfig {
    pub fn new(epsilon: f64, expected_count: u64) -> Self {
        Self {
            epsilon,
            expected_count,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_expected_count(mut self, expected_count: u64) -> Self {
        self.expected_count = expected_count;
        self
    }

    /// Check that the parameters give a usable level capacity
    pub fn validate(&self) -> Result<()> {
        self.level_capacity().map(|_| ())
    }

    /// Tuples held per level: `floor(ln(epsilon * expected_count) / epsilon)`
    pub fn level_capacity(&self) -> Result<usize> {
        Error::check_epsilon(self.epsilon)?;
        let capacity = ((self.epsilon * self.expected_count as f64).ln() / self.epsilon).floor();
        if !(capacity >= 1.0) || capacity >= usize::MAX as f64 {
            return Err(Error::InvalidParameter(format!(
                "epsilon {} with expected count {} gives no usable level capacity",
                self.epsilon, self.expected_count
            )));
        }
        Ok(capacity as usize)
    }

    /// Number of rank targets a full level is pruned to: `ceil((b + 1) / 2) + 1`
    pub fn prune_bins(&self) -> Result<usize> {
        let b = self.level_capacity()?;
        Ok((b + 1).div_ceil(2) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = StreamConfig::default();
        assert_eq!(config.epsilon, 0.01);
        assert_eq!(config.expected_count, 1_000_000);
        assert!(config.validate().is_ok());
        // ln(10_000) / 0.01
        assert_eq!(config.level_capacity().unwrap(), 921);
        assert_eq!(config.prune_bins().unwrap(), 462);
    }

    #[test]
    fn test_builder() {
        let config = StreamConfig::default()
            .with_epsilon(1.0)
            .with_expected_count(8);
        assert_eq!(config, StreamConfig::new(1.0, 8));
        assert_eq!(config.level_capacity().unwrap(), 2);
        assert_eq!(config.prune_bins().unwrap(), 3);

        let config = StreamConfig::new(0.001, 3003);
        assert_eq!(config.level_capacity().unwrap(), 1099);
    }

    #[test]
    fn test_invalid_parameters() {
        // epsilon * n <= 1 gives a non-positive logarithm
        assert!(matches!(
            StreamConfig::new(0.1, 10).validate(),
            Err(Error::InvalidParameter(_))
        ));
        assert!(StreamConfig::new(0.5, 0).validate().is_err());
        assert!(StreamConfig::new(0.0, 1000).validate().is_err());
        assert!(StreamConfig::new(1.5, 1000).validate().is_err());
        assert!(StreamConfig::new(f64::NAN, 1000).validate().is_err());
    }
}
