//! Configuration for aggregation.

use firn_series::Cadence;

use crate::error::AggregateError;

/// Configuration for [`aggregate`](crate::aggregate).
///
/// # Example
///
/// ```
/// use firn_aggregate::AggregateConfig;
/// use firn_series::Cadence;
///
/// let config = AggregateConfig::new(Cadence::minutes(15).unwrap()).with_min_count(2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AggregateConfig {
    cadence: Cadence,
    min_count: usize,
}

impl AggregateConfig {
    /// Creates a configuration for the given cadence with `min_count = 1`.
    pub fn new(cadence: Cadence) -> Self {
        Self {
            cadence,
            min_count: 1,
        }
    }

    /// Daily aggregation.
    pub fn daily() -> Self {
        Self::new(Cadence::daily())
    }

    /// Sets the minimum number of observations for a bucket to be summarised.
    pub fn with_min_count(mut self, n: usize) -> Self {
        self.min_count = n;
        self
    }

    /// Returns the cadence.
    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Returns the minimum observation count per bucket.
    pub fn min_count(&self) -> usize {
        self.min_count
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::InvalidConfig`] if `min_count` is zero.
    pub fn validate(&self) -> Result<(), AggregateError> {
        if self.min_count == 0 {
            return Err(AggregateError::InvalidConfig {
                reason: "min_count must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self::daily()
    }
}
