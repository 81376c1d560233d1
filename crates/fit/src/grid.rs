//! Evenly spaced evaluation grids.

use crate::error::FitError;

/// `n` evenly spaced points from `start` to `end`, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleGrid {
    start: f64,
    end: f64,
    n: usize,
}

impl SampleGrid {
    /// Creates a grid.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::InvalidConfig`] if the bounds are not finite,
    /// `end <= start`, or fewer than two points are requested.
    pub fn new(start: f64, end: f64, n: usize) -> Result<Self, FitError> {
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(FitError::InvalidConfig {
                reason: format!("grid bounds must be finite with start < end, got [{start}, {end}]"),
            });
        }
        if n < 2 {
            return Err(FitError::InvalidConfig {
                reason: format!("grid needs at least 2 points, got {n}"),
            });
        }
        Ok(Self { start, end, n })
    }

    /// Height grid for the mass–height curve: 0 to 1.5 m in 1 cm steps.
    pub fn height_default() -> Self {
        Self {
            start: 0.0,
            end: 1.5,
            n: 151,
        }
    }

    /// Extended height grid for error budgets: 0 to 10 m in 1 cm steps.
    pub fn height_extended() -> Self {
        Self {
            start: 0.0,
            end: 10.0,
            n: 1001,
        }
    }

    /// Solution-count grid for the noise-decay curve: 1 to 96 in steps of 0.1.
    pub fn count_default() -> Self {
        Self {
            start: 1.0,
            end: 96.0,
            n: 951,
        }
    }

    /// First grid point.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Last grid point.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always false; a grid has at least two points.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Spacing between consecutive points.
    pub fn step(&self) -> f64 {
        (self.end - self.start) / (self.n - 1) as f64
    }

    /// Grid points in increasing order.
    pub fn points(&self) -> Vec<f64> {
        let step = self.step();
        (0..self.n)
            .map(|i| {
                if i == self.n - 1 {
                    self.end
                } else {
                    self.start + step * i as f64
                }
            })
            .collect()
    }
}
