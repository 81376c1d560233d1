//! Immutable fit results.

use serde::Serialize;

use crate::grid::SampleGrid;
use crate::model::{CurveModel, ExponentialParams};

/// A fitted curve sampled on a grid, with parameter uncertainties.
#[derive(Debug, Clone, Serialize)]
pub struct FitResult {
    model: CurveModel,
    std_errors: Vec<f64>,
    n_samples: usize,
    residual_rms: f64,
    domain: Vec<f64>,
    fitted: Vec<f64>,
}

impl FitResult {
    pub(crate) fn new(
        model: CurveModel,
        std_errors: Vec<f64>,
        n_samples: usize,
        residual_rms: f64,
        grid: &SampleGrid,
    ) -> Self {
        let domain = grid.points();
        let fitted = domain.iter().map(|&x| model.evaluate(x)).collect();
        Self {
            model,
            std_errors,
            n_samples,
            residual_rms,
            domain,
            fitted,
        }
    }

    /// The fitted model.
    pub fn model(&self) -> &CurveModel {
        &self.model
    }

    /// Parameter vector.
    pub fn params(&self) -> Vec<f64> {
        self.model.params()
    }

    /// One-sigma standard errors, aligned with [`params`](Self::params).
    pub fn std_errors(&self) -> &[f64] {
        &self.std_errors
    }

    /// Number of samples the model was fitted to (anchor excluded).
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Root-mean-square of the unweighted residuals.
    pub fn residual_rms(&self) -> f64 {
        self.residual_rms
    }

    /// Grid the curve was sampled on.
    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    /// Curve values on [`domain`](Self::domain).
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// Exponential parameters, if this is an exponential fit.
    pub fn exponential(&self) -> Option<ExponentialParams> {
        match self.model {
            CurveModel::Exponential(p) => Some(p),
            _ => None,
        }
    }

    /// Evaluates the fitted model at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.model.evaluate(x)
    }
}
