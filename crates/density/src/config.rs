//! Configuration for density estimation.

use crate::error::DensityError;

/// Configuration for [`estimate_density`](crate::estimate_density).
#[derive(Debug, Clone, Default)]
pub struct DensityConfig {
    interpolate_gaps: bool,
}

impl DensityConfig {
    /// Creates a configuration that divides bucket medians as they are.
    pub fn new() -> Self {
        Self::default()
    }

    /// Linearly fills interior gaps in both medians before dividing.
    pub fn with_interpolate_gaps(mut self, interpolate: bool) -> Self {
        self.interpolate_gaps = interpolate;
        self
    }

    /// Returns whether gaps are interpolated.
    pub fn interpolate_gaps(&self) -> bool {
        self.interpolate_gaps
    }
}

/// Configuration for [`new_snow_density`](crate::new_snow_density).
///
/// # Example
///
/// ```
/// use firn_density::NewSnowConfig;
///
/// let config = NewSnowConfig::new().with_interval(4).with_min_gain(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct NewSnowConfig {
    interval: usize,
    min_gain: f64,
}

impl NewSnowConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: `interval = 6` buckets, `min_gain = 0.03` m.
    pub fn new() -> Self {
        Self {
            interval: 6,
            min_gain: 0.03,
        }
    }

    /// Sets the centred interval length in buckets. Must be even.
    pub fn with_interval(mut self, interval: usize) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the minimum height gain (m) for a gain to count as new snow.
    pub fn with_min_gain(mut self, min_gain: f64) -> Self {
        self.min_gain = min_gain;
        self
    }

    /// Returns the interval length in buckets.
    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Returns the minimum height gain.
    pub fn min_gain(&self) -> f64 {
        self.min_gain
    }

    /// Half the interval as a bucket-step multiplier.
    pub(crate) fn half_steps(&self) -> Result<i32, DensityError> {
        i32::try_from(self.interval / 2).map_err(|_| DensityError::InvalidConfig {
            reason: format!("interval {} is too large", self.interval),
        })
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DensityError::InvalidConfig`] if the interval is zero, odd or
    /// too large to express as a time offset, or the minimum gain is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<(), DensityError> {
        if self.interval == 0 || self.interval % 2 != 0 {
            return Err(DensityError::InvalidConfig {
                reason: format!("interval must be a positive even number, got {}", self.interval),
            });
        }
        self.half_steps()?;
        if !self.min_gain.is_finite() || self.min_gain <= 0.0 {
            return Err(DensityError::InvalidConfig {
                reason: format!("min_gain must be positive and finite, got {}", self.min_gain),
            });
        }
        Ok(())
    }
}

impl Default for NewSnowConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_interval_is_rejected() {
        assert!(NewSnowConfig::new().with_interval(3).validate().is_err());
        assert!(NewSnowConfig::new().with_interval(0).validate().is_err());
    }

    #[test]
    fn oversized_interval_is_rejected() {
        let cfg = NewSnowConfig::new().with_interval(usize::MAX - 1);
        assert!(matches!(cfg.validate(), Err(DensityError::InvalidConfig { .. })));
        assert!(NewSnowConfig::new().with_interval(1_000).validate().is_ok());
    }

    #[test]
    fn non_positive_gain_is_rejected() {
        assert!(NewSnowConfig::new().with_min_gain(0.0).validate().is_err());
    }
}
