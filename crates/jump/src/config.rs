//! Configuration for discontinuity correction.

use crate::error::JumpError;

/// Which step polarity is treated as a discontinuity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpDirection {
    /// Only upward steps (`next - prev > T`).
    Rising,
    /// Only downward steps (`next - prev < -T`).
    Falling,
    /// Steps of either sign (`|next - prev| > T`).
    #[default]
    Either,
}

impl JumpDirection {
    /// Whether `step` exceeds `threshold` in this direction.
    pub fn exceeds(self, step: f64, threshold: f64) -> bool {
        match self {
            Self::Rising => step > threshold,
            Self::Falling => step < -threshold,
            Self::Either => step.abs() > threshold,
        }
    }
}

/// Configuration for [`correct_discontinuities`](crate::correct_discontinuities).
///
/// # Example
///
/// ```
/// use firn_jump::{JumpConfig, JumpDirection};
///
/// let config = JumpConfig::new(1000.0).with_direction(JumpDirection::Falling);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct JumpConfig {
    threshold: f64,
    direction: JumpDirection,
    remove_transients: bool,
    max_corrections: usize,
}

impl JumpConfig {
    /// Creates a configuration with the given step threshold.
    ///
    /// Defaults: `direction = Either`, `remove_transients = true`,
    /// `max_corrections = 10_000`.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            direction: JumpDirection::Either,
            remove_transients: true,
            max_corrections: 10_000,
        }
    }

    /// Preset for baseline-length series, where re-mounts produce drops.
    pub fn baseline(threshold: f64) -> Self {
        Self::new(threshold).with_direction(JumpDirection::Falling)
    }

    /// Preset for reflector-height series, where re-mounts produce rises.
    pub fn reflector(threshold: f64) -> Self {
        Self::new(threshold).with_direction(JumpDirection::Rising)
    }

    /// Sets the step polarity to correct.
    pub fn with_direction(mut self, direction: JumpDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Enables or disables transient spike removal.
    pub fn with_remove_transients(mut self, remove: bool) -> Self {
        self.remove_transients = remove;
        self
    }

    /// Sets the bound on correction rounds.
    pub fn with_max_corrections(mut self, n: usize) -> Self {
        self.max_corrections = n;
        self
    }

    /// Returns the step threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the step polarity.
    pub fn direction(&self) -> JumpDirection {
        self.direction
    }

    /// Returns whether transient spikes are removed first.
    pub fn remove_transients(&self) -> bool {
        self.remove_transients
    }

    /// Returns the bound on correction rounds.
    pub fn max_corrections(&self) -> usize {
        self.max_corrections
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`JumpError::InvalidConfig`] if the threshold is not a
    /// positive finite number or `max_corrections` is zero.
    pub fn validate(&self) -> Result<(), JumpError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(JumpError::InvalidConfig {
                reason: format!(
                    "threshold must be positive and finite, got {}",
                    self.threshold
                ),
            });
        }
        if self.max_corrections == 0 {
            return Err(JumpError::InvalidConfig {
                reason: "max_corrections must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
