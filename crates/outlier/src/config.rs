//! Configuration for the outlier filters.

use chrono::Duration;

use crate::error::OutlierError;

/// Configuration for [`sigma_clip`](crate::sigma_clip).
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use firn_outlier::SigmaClipConfig;
///
/// let config = SigmaClipConfig::new()
///     .with_window(Duration::days(3))
///     .with_sigma(1.9);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SigmaClipConfig {
    window: Duration,
    sigma: f64,
}

impl SigmaClipConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: `window = 3 days`, `sigma = 3.0`.
    pub fn new() -> Self {
        Self {
            window: Duration::days(3),
            sigma: 3.0,
        }
    }

    /// Sets the trailing window length.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Sets the sigma multiplier `k`.
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Returns the trailing window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns the sigma multiplier.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OutlierError::InvalidConfig`] if the window is not positive
    /// or the sigma multiplier is not a positive finite number.
    pub fn validate(&self) -> Result<(), OutlierError> {
        validate_window(self.window)?;
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(OutlierError::InvalidConfig {
                reason: format!("sigma must be positive and finite, got {}", self.sigma),
            });
        }
        Ok(())
    }
}

impl Default for SigmaClipConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_window(window: Duration) -> Result<(), OutlierError> {
    if window <= Duration::zero() {
        return Err(OutlierError::InvalidConfig {
            reason: format!("window must be positive, got {window}"),
        });
    }
    Ok(())
}
