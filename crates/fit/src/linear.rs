//! Ordinary least-squares line.

use crate::error::FitError;
use crate::grid::SampleGrid;
use crate::model::CurveModel;
use crate::pairs::{check_finite, is_constant};
use crate::result::FitResult;

/// Number of points the fitted line is sampled on.
const LINE_SAMPLES: usize = 101;

/// Fits `y = slope·x + intercept` by ordinary least squares.
///
/// The line is sampled on an evenly spaced grid spanning the observed `x`.
///
/// # Errors
///
/// - [`FitError::NonFiniteData`] if any value is NaN or infinite.
/// - [`FitError::InsufficientData`] with fewer than 3 pairs.
/// - [`FitError::DegenerateData`] if `x` is constant.
pub fn fit_linear(pairs: &[(f64, f64)]) -> Result<FitResult, FitError> {
    check_finite(pairs)?;
    if pairs.len() < 3 {
        return Err(FitError::InsufficientData {
            n: pairs.len(),
            min: 3,
        });
    }
    if is_constant(pairs.iter().map(|p| p.0)) {
        return Err(FitError::DegenerateData {
            reason: "x values are constant".to_string(),
        });
    }

    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = pairs.iter().map(|(x, _)| (x - mx).powi(2)).sum();
    let sxy: f64 = pairs.iter().map(|(x, y)| (x - mx) * (y - my)).sum();
    let slope = sxy / sxx;
    let intercept = my - slope * mx;

    let rss: f64 = pairs
        .iter()
        .map(|(x, y)| (y - slope * x - intercept).powi(2))
        .sum();
    let s2 = rss / (n - 2.0);
    let se_slope = (s2 / sxx).sqrt();
    let se_intercept = (s2 * (1.0 / n + mx * mx / sxx)).sqrt();

    let (lo, hi) = pairs.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.0), hi.max(p.0))
    });
    let grid = SampleGrid::new(lo, hi, LINE_SAMPLES)?;

    Ok(FitResult::new(
        CurveModel::Linear { slope, intercept },
        vec![se_slope, se_intercept],
        pairs.len(),
        (rss / n).sqrt(),
        &grid,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_line() {
        let pairs = [(1.0, 3.0), (2.0, 5.0), (4.0, 9.0)];
        let fit = fit_linear(&pairs).unwrap();
        assert_relative_eq!(fit.params()[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(fit.params()[1], 1.0, epsilon = 1e-12);
        assert_eq!(fit.domain()[0], 1.0);
        assert_eq!(fit.domain()[100], 4.0);
    }

    #[test]
    fn standard_errors_match_textbook() {
        // x = 0..4, y = [0, 2, 1, 3, 4]: slope 0.9, intercept 0.2,
        // rss = 1.9, s² = 1.9/3, Sxx = 10.
        let pairs = [(0.0, 0.0), (1.0, 2.0), (2.0, 1.0), (3.0, 3.0), (4.0, 4.0)];
        let fit = fit_linear(&pairs).unwrap();
        let s2: f64 = 1.9 / 3.0;
        assert_relative_eq!(fit.params()[0], 0.9, epsilon = 1e-12);
        assert_relative_eq!(fit.std_errors()[0], (s2 / 10.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(
            fit.std_errors()[1],
            (s2 * (0.2 + 4.0 / 10.0)).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn vertical_data_is_degenerate() {
        let pairs = [(1.0, 1.0), (1.0, 2.0), (1.0, 3.0)];
        assert!(matches!(fit_linear(&pairs), Err(FitError::DegenerateData { .. })));
    }
}
