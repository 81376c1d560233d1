//! Pairing of co-located series into fit samples.

use firn_series::TimeSeries;

/// Joins two series on identical timestamps and returns `(x, y)` pairs
/// sorted by `x`. Timestamps where either value is missing are skipped.
pub fn pair_by_time(x: &TimeSeries, y: &TimeSeries) -> Vec<(f64, f64)> {
    let mut pairs: Vec<(f64, f64)> = x.inner_join(y).into_iter().map(|(_, a, b)| (a, b)).collect();
    pairs.sort_by(|p, q| p.0.total_cmp(&q.0));
    pairs
}

/// Rejects empty or non-finite input.
pub(crate) fn check_finite(pairs: &[(f64, f64)]) -> Result<(), crate::FitError> {
    if pairs.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(crate::FitError::NonFiniteData);
    }
    Ok(())
}

/// Whether all values are (numerically) identical.
pub(crate) fn is_constant(values: impl Iterator<Item = f64>) -> bool {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    (hi - lo).abs() < f64::EPSILON * hi.abs().max(lo.abs()).max(1.0)
}
