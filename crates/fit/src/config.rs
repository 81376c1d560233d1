//! Configuration for the exponential fit.

use crate::error::FitError;
use crate::grid::SampleGrid;

/// Configuration for [`fit_exponential`](crate::fit_exponential).
///
/// # Example
///
/// ```
/// use firn_fit::{ExponentialFitConfig, SampleGrid};
///
/// let config = ExponentialFitConfig::new()
///     .with_rate_bounds(-5.0, 5.0)
///     .with_domain(SampleGrid::new(0.0, 2.0, 201).unwrap());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ExponentialFitConfig {
    anchor: bool,
    anchor_sigma: f64,
    rate_min: f64,
    rate_max: f64,
    scan_points: usize,
    max_iters: u64,
    domain: SampleGrid,
}

impl ExponentialFitConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: anchored at `(0, 0)` with `anchor_sigma = 1e-6`, rate scan
    /// over `[-10, 10]` with 401 points, `max_iters = 1000`, domain
    /// [`SampleGrid::height_default`].
    pub fn new() -> Self {
        Self {
            anchor: true,
            anchor_sigma: 1e-6,
            rate_min: -10.0,
            rate_max: 10.0,
            scan_points: 401,
            max_iters: 1000,
            domain: SampleGrid::height_default(),
        }
    }

    /// Enables or disables the `(0, 0)` anchor sample.
    pub fn with_anchor(mut self, anchor: bool) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the standard deviation assigned to the anchor sample. All other
    /// samples carry unit standard deviation.
    pub fn with_anchor_sigma(mut self, sigma: f64) -> Self {
        self.anchor_sigma = sigma;
        self
    }

    /// Sets the range scanned for the rate parameter `b`.
    pub fn with_rate_bounds(mut self, min: f64, max: f64) -> Self {
        self.rate_min = min;
        self.rate_max = max;
        self
    }

    /// Sets the number of points in the coarse rate scan.
    pub fn with_scan_points(mut self, n: usize) -> Self {
        self.scan_points = n;
        self
    }

    /// Sets the iteration bound of the Nelder–Mead refinement.
    pub fn with_max_iters(mut self, n: u64) -> Self {
        self.max_iters = n;
        self
    }

    /// Sets the grid the fitted curve is sampled on.
    pub fn with_domain(mut self, domain: SampleGrid) -> Self {
        self.domain = domain;
        self
    }

    /// Returns whether the anchor sample is added.
    pub fn anchor(&self) -> bool {
        self.anchor
    }

    /// Returns the anchor standard deviation.
    pub fn anchor_sigma(&self) -> f64 {
        self.anchor_sigma
    }

    /// Returns the rate scan bounds.
    pub fn rate_bounds(&self) -> (f64, f64) {
        (self.rate_min, self.rate_max)
    }

    /// Returns the number of scan points.
    pub fn scan_points(&self) -> usize {
        self.scan_points
    }

    /// Returns the refinement iteration bound.
    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    /// Returns the sampling domain.
    pub fn domain(&self) -> &SampleGrid {
        &self.domain
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::InvalidConfig`] if the anchor sigma is not positive,
    /// the rate bounds are empty or non-finite, fewer than three scan points
    /// are requested, or `max_iters` is zero.
    pub fn validate(&self) -> Result<(), FitError> {
        if !self.anchor_sigma.is_finite() || self.anchor_sigma <= 0.0 {
            return Err(FitError::InvalidConfig {
                reason: format!("anchor_sigma must be positive, got {}", self.anchor_sigma),
            });
        }
        if !self.rate_min.is_finite() || !self.rate_max.is_finite() || self.rate_min >= self.rate_max {
            return Err(FitError::InvalidConfig {
                reason: format!(
                    "rate bounds must be finite with min < max, got [{}, {}]",
                    self.rate_min, self.rate_max
                ),
            });
        }
        if self.scan_points < 3 {
            return Err(FitError::InvalidConfig {
                reason: format!("scan_points must be at least 3, got {}", self.scan_points),
            });
        }
        if self.max_iters == 0 {
            return Err(FitError::InvalidConfig {
                reason: "max_iters must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ExponentialFitConfig {
    fn default() -> Self {
        Self::new()
    }
}
