//! Parametric curve models.

use serde::Serialize;

/// Parameters of `mass(h) = a·exp(b·h) + c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExponentialParams {
    /// Amplitude.
    pub a: f64,
    /// Rate.
    pub b: f64,
    /// Offset.
    pub c: f64,
}

impl ExponentialParams {
    /// Evaluates the model at height `h`.
    pub fn evaluate(&self, h: f64) -> f64 {
        self.a * (self.b * h).exp() + self.c
    }
}

/// A fitted curve model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum CurveModel {
    /// `y = a·exp(b·x) + c`.
    Exponential(ExponentialParams),
    /// `y = sigma0 / sqrt(x)`.
    NoiseDecay {
        /// Noise of a single solution.
        sigma0: f64,
    },
    /// `y = slope·x + intercept`.
    Linear {
        /// Slope.
        slope: f64,
        /// Intercept.
        intercept: f64,
    },
}

impl CurveModel {
    /// Evaluates the model at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Self::Exponential(p) => p.evaluate(x),
            Self::NoiseDecay { sigma0 } => sigma0 / x.sqrt(),
            Self::Linear { slope, intercept } => slope * x + intercept,
        }
    }

    /// Parameter vector in declaration order.
    pub fn params(&self) -> Vec<f64> {
        match self {
            Self::Exponential(p) => vec![p.a, p.b, p.c],
            Self::NoiseDecay { sigma0 } => vec![*sigma0],
            Self::Linear { slope, intercept } => vec![*slope, *intercept],
        }
    }

    /// Short model name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exponential(_) => "exponential",
            Self::NoiseDecay { .. } => "noise_decay",
            Self::Linear { .. } => "linear",
        }
    }
}
