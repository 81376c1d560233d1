//! Noise-decay model `noise(n) = σ₀ / sqrt(n)`.

use tracing::debug;

use crate::error::FitError;
use crate::grid::SampleGrid;
use crate::model::CurveModel;
use crate::pairs::check_finite;
use crate::result::FitResult;

/// Fits `noise(n) = σ₀ / sqrt(n)` to `(n, noise)` pairs, where `n` is the
/// number of solutions in an aggregation bucket.
///
/// The model is linear in `σ₀`, so the least-squares estimate is closed
/// form: `σ₀ = Σ yᵢ/√nᵢ / Σ 1/nᵢ`. The standard error uses the residual
/// variance with `N - 1` degrees of freedom.
///
/// # Errors
///
/// - [`FitError::NonFiniteData`] if any value is NaN or infinite.
/// - [`FitError::InsufficientData`] with fewer than 2 pairs.
/// - [`FitError::DegenerateData`] if any count is not positive.
#[tracing::instrument(skip(pairs), fields(n = pairs.len()))]
pub fn fit_noise_decay(pairs: &[(f64, f64)], domain: &SampleGrid) -> Result<FitResult, FitError> {
    check_finite(pairs)?;
    if pairs.len() < 2 {
        return Err(FitError::InsufficientData {
            n: pairs.len(),
            min: 2,
        });
    }
    if let Some(&(n, _)) = pairs.iter().find(|(n, _)| *n <= 0.0) {
        return Err(FitError::DegenerateData {
            reason: format!("solution counts must be positive, got {n}"),
        });
    }

    let sum_uy: f64 = pairs.iter().map(|(n, y)| y / n.sqrt()).sum();
    let sum_uu: f64 = pairs.iter().map(|(n, _)| 1.0 / n).sum();
    let sigma0 = sum_uy / sum_uu;

    let rss: f64 = pairs
        .iter()
        .map(|(n, y)| (y - sigma0 / n.sqrt()).powi(2))
        .sum();
    let dof = (pairs.len() - 1) as f64;
    let std_error = (rss / dof / sum_uu).sqrt();
    let residual_rms = (rss / pairs.len() as f64).sqrt();

    debug!(sigma0, std_error, "noise decay fitted");
    Ok(FitResult::new(
        CurveModel::NoiseDecay { sigma0 },
        vec![std_error],
        pairs.len(),
        residual_rms,
        domain,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_decay_is_recovered() {
        let pairs: Vec<(f64, f64)> = [1.0, 4.0, 16.0, 64.0, 96.0]
            .iter()
            .map(|&n| (n, 30.0 / f64::sqrt(n)))
            .collect();
        let fit = fit_noise_decay(&pairs, &SampleGrid::count_default()).unwrap();
        assert_relative_eq!(fit.params()[0], 30.0, epsilon = 1e-12);
        assert!(fit.std_errors()[0] < 1e-10);
        assert_eq!(fit.domain().len(), 951);
        assert_relative_eq!(fit.fitted()[0], 30.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_count_is_degenerate() {
        let pairs = [(0.0, 1.0), (4.0, 0.5)];
        assert!(matches!(
            fit_noise_decay(&pairs, &SampleGrid::count_default()),
            Err(FitError::DegenerateData { .. })
        ));
    }

    #[test]
    fn single_pair_is_insufficient() {
        assert!(matches!(
            fit_noise_decay(&[(4.0, 1.0)], &SampleGrid::count_default()),
            Err(FitError::InsufficientData { n: 1, min: 2 })
        ));
    }
}
