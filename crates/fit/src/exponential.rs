//! Weighted exponential fit `y = a·exp(b·x) + c` by variable projection.
//!
//! For a fixed rate `b` the model is linear in `(a, c)`, so the weighted
//! least-squares problem is solved exactly by a 2-column QR. Only the
//! one-dimensional profile cost over `b` is searched numerically: a coarse
//! scan brackets the minimum and Nelder–Mead refines it.
//!
//! **Not part of the public API** beyond [`fit_exponential`].

use argmin::core::{CostFunction, Executor, State, TerminationReason};
use argmin::solver::neldermead::NelderMead;
use tracing::{debug, warn};

use crate::config::ExponentialFitConfig;
use crate::error::FitError;
use crate::model::{CurveModel, ExponentialParams};
use crate::pairs::{check_finite, is_constant};
use crate::result::FitResult;
use crate::small_linalg::GivensQr;

const MODEL: &str = "exponential";

/// A sample with its standard deviation.
#[derive(Debug, Clone, Copy)]
struct WeightedSample {
    x: f64,
    y: f64,
    sigma: f64,
}

/// Optimal linear parameters and weighted residual sum of squares at a
/// fixed rate.
#[derive(Debug, Clone, Copy)]
struct Profile {
    a: f64,
    c: f64,
    chi2: f64,
}

fn profile(b: f64, samples: &[WeightedSample]) -> Option<Profile> {
    let mut qr = GivensQr::<2>::new();
    for s in samples {
        let e = (b * s.x).exp();
        if !e.is_finite() {
            return None;
        }
        qr.add_row([e / s.sigma, 1.0 / s.sigma], s.y / s.sigma);
    }
    let sol = qr.solve()?;
    let chi2 = qr.rss();
    chi2.is_finite().then_some(Profile {
        a: sol.data[0],
        c: sol.data[1],
        chi2,
    })
}

/// Cost function for argmin: profile chi-square over the rate.
struct ProfileCost<'a> {
    samples: &'a [WeightedSample],
}

impl CostFunction for ProfileCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(profile(param[0], self.samples).map_or(f64::MAX, |p| p.chi2))
    }
}

/// Fits `y = a·exp(b·x) + c` to `(x, y)` pairs.
///
/// With the anchor enabled (the default) the sample `(0, 0)` is added with
/// standard deviation `anchor_sigma`, pinning the curve through the origin;
/// all data samples carry unit standard deviation. Parameter standard errors
/// follow the curve-fit convention `sqrt(diag((JᵀWJ)⁻¹) · χ²/(N - 3))`.
///
/// # Errors
///
/// - [`FitError::InvalidConfig`] for an invalid configuration.
/// - [`FitError::NonFiniteData`] if any value is NaN or infinite.
/// - [`FitError::InsufficientData`] with fewer than 3 pairs (4 unanchored).
/// - [`FitError::DegenerateData`] if `x` or `y` is constant, or the
///   parameters are not identifiable at the optimum.
/// - [`FitError::ConvergenceFailed`] if no finite optimum is found.
#[tracing::instrument(skip(pairs, config), fields(n = pairs.len()))]
pub fn fit_exponential(
    pairs: &[(f64, f64)],
    config: &ExponentialFitConfig,
) -> Result<FitResult, FitError> {
    config.validate()?;
    check_finite(pairs)?;
    let min = if config.anchor() { 3 } else { 4 };
    if pairs.len() < min {
        return Err(FitError::InsufficientData {
            n: pairs.len(),
            min,
        });
    }
    if is_constant(pairs.iter().map(|p| p.0)) {
        return Err(FitError::DegenerateData {
            reason: "x values are constant".to_string(),
        });
    }
    if is_constant(pairs.iter().map(|p| p.1)) {
        return Err(FitError::DegenerateData {
            reason: "y values are constant".to_string(),
        });
    }

    let mut samples: Vec<WeightedSample> = Vec::with_capacity(pairs.len() + 1);
    if config.anchor() {
        samples.push(WeightedSample {
            x: 0.0,
            y: 0.0,
            sigma: config.anchor_sigma(),
        });
    }
    samples.extend(pairs.iter().map(|&(x, y)| WeightedSample { x, y, sigma: 1.0 }));

    // 1. Coarse scan of the profile cost
    let (rate_min, rate_max) = config.rate_bounds();
    let step = (rate_max - rate_min) / (config.scan_points() - 1) as f64;
    let (b_scan, scan_best) = (0..config.scan_points())
        .map(|i| rate_min + step * i as f64)
        .filter_map(|b| profile(b, &samples).map(|p| (b, p)))
        .min_by(|(_, p), (_, q)| p.chi2.total_cmp(&q.chi2))
        .ok_or_else(|| FitError::ConvergenceFailed {
            model: MODEL,
            reason: "profile cost is undefined on the whole rate scan".to_string(),
        })?;

    // 2. Nelder–Mead refinement around the best scan point; the cost
    // tolerance scales with the scan minimum
    let tolerance = 1e-12 * scan_best.chi2.max(1.0);
    let b = refine(b_scan, step, &samples, tolerance, config.max_iters())?;
    let best = match profile(b, &samples) {
        Some(p) if p.chi2 <= scan_best.chi2 => (b, p),
        _ => (b_scan, scan_best),
    };
    let (b, Profile { a, c, chi2 }) = best;
    let params = ExponentialParams { a, b, c };

    // 3. Parameter covariance from the weighted Jacobian
    let std_errors = std_errors(&params, &samples, chi2)?;

    let residual_rms = (pairs
        .iter()
        .map(|&(x, y)| (y - params.evaluate(x)).powi(2))
        .sum::<f64>()
        / pairs.len() as f64)
        .sqrt();

    debug!(a, b, c, chi2, residual_rms, "exponential fit converged");
    Ok(FitResult::new(
        CurveModel::Exponential(params),
        std_errors,
        pairs.len(),
        residual_rms,
        config.domain(),
    ))
}

fn refine(
    b0: f64,
    step: f64,
    samples: &[WeightedSample],
    tolerance: f64,
    max_iters: u64,
) -> Result<f64, FitError> {
    let failed = |reason: String| FitError::ConvergenceFailed {
        model: MODEL,
        reason,
    };

    let solver = NelderMead::new(vec![vec![b0], vec![b0 + step]])
        .with_sd_tolerance(tolerance)
        .map_err(|e| failed(e.to_string()))?;
    let result = Executor::new(ProfileCost { samples }, solver)
        .configure(|state| state.max_iters(max_iters))
        .run()
        .map_err(|e| failed(e.to_string()))?;

    let state = result.state();
    if let Some(TerminationReason::MaxItersReached) = state.get_termination_reason() {
        warn!(max_iters, "rate refinement hit its iteration bound");
        return Err(failed(format!("no convergence within {max_iters} iterations")));
    }
    let best = state
        .best_param
        .as_ref()
        .and_then(|p| p.first().copied())
        .ok_or_else(|| failed("optimizer returned no parameters".to_string()))?;
    if !best.is_finite() || state.best_cost >= f64::MAX {
        return Err(failed("optimizer left the feasible region".to_string()));
    }
    Ok(best)
}

fn std_errors(
    params: &ExponentialParams,
    samples: &[WeightedSample],
    chi2: f64,
) -> Result<Vec<f64>, FitError> {
    let mut qr = GivensQr::<3>::new();
    for s in samples {
        let e = (params.b * s.x).exp();
        qr.add_row([e / s.sigma, params.a * s.x * e / s.sigma, 1.0 / s.sigma], 0.0);
    }
    let cov = qr
        .inverse_normal_matrix()
        .ok_or_else(|| FitError::DegenerateData {
            reason: "parameters are not identifiable at the optimum".to_string(),
        })?;
    let dof = (samples.len() - 3) as f64;
    let scale = chi2 / dof;
    Ok(cov
        .diagonal()
        .data
        .iter()
        .map(|v| (v * scale).max(0.0).sqrt())
        .collect())
}
