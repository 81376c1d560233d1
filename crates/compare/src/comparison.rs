//! Full comparison of a series with a reference.

use firn_fit::{FitResult, fit_linear, pair_by_time};
use firn_series::TimeSeries;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::CompareError;
use crate::residuals::{ResidualStats, residual_stats};

/// Agreement of one series with a reference.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    /// Name of the compared pair, e.g. `"upper - lower"`.
    pub label: String,
    /// Residual statistics of the data against the reference.
    pub residuals: ResidualStats,
    /// Pearson correlation of the co-located values.
    pub correlation: Option<f64>,
    /// Linear dependency `data = slope · reference + intercept`.
    pub linear: Option<FitResult>,
}

/// Compares `data` with `reference` on their common timestamps.
///
/// The linear dependency is omitted, with a warning, when it cannot be
/// fitted (fewer than three common values or a constant reference).
///
/// # Errors
///
/// Returns [`CompareError::InsufficientOverlap`] if the series share fewer
/// than two observed timestamps.
#[tracing::instrument(skip(reference, data))]
pub fn compare_series(
    label: &str,
    reference: &TimeSeries,
    data: &TimeSeries,
) -> Result<Comparison, CompareError> {
    let residuals = residual_stats(reference, data)?;

    let pairs = pair_by_time(reference, data);
    let (x, y): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
    let correlation = firn_stats::pearson_correlation(&x, &y);
    let linear = match fit_linear(&pairs) {
        Ok(fit) => Some(fit),
        Err(e) => {
            warn!(label, error = %e, "linear dependency not fitted");
            None
        }
    };

    info!(
        label,
        n = residuals.n,
        rmse = residuals.absolute.rmse,
        r_squared = ?residuals.r_squared,
        "series compared"
    );
    Ok(Comparison {
        label: label.to_string(),
        residuals,
        correlation,
        linear,
    })
}

/// Serializes comparisons to pretty-printed JSON.
pub fn to_json(comparisons: &[Comparison]) -> Result<String, CompareError> {
    serde_json::to_string_pretty(comparisons).map_err(|e| CompareError::Serialization {
        reason: e.to_string(),
    })
}
