//! Residuals of a series against a reference.

use firn_series::TimeSeries;
use serde::Serialize;
use tracing::debug;

use crate::error::CompareError;

/// Minimum number of co-located observations for residual statistics.
pub const MIN_OVERLAP: usize = 2;

/// Absolute and percentage residuals `data - reference`, on the common
/// timestamps of both series.
#[derive(Debug, Clone, PartialEq)]
pub struct Residuals {
    /// `data - reference`.
    pub absolute: TimeSeries,
    /// `(data - reference) / reference · 100`; missing where the reference
    /// is zero.
    pub percent: TimeSeries,
}

/// Summary of one residual vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResidualSummary {
    /// Mean error.
    pub me: f64,
    /// Mean absolute error.
    pub mae: f64,
    /// `max - min` of the residuals.
    pub range: f64,
    /// Mean squared error.
    pub mse: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Sample standard deviation of the residuals.
    pub std: f64,
}

impl ResidualSummary {
    fn from_residuals(r: &[f64]) -> Option<Self> {
        if r.is_empty() {
            return None;
        }
        let n = r.len() as f64;
        let me = firn_stats::mean(r);
        let mae = r.iter().map(|v| v.abs()).sum::<f64>() / n;
        let (lo, hi) = r
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let mse = r.iter().map(|v| v * v).sum::<f64>() / n;
        Some(Self {
            me,
            mae,
            range: hi - lo,
            mse,
            rmse: mse.sqrt(),
            std: firn_stats::sd(r),
        })
    }
}

/// Agreement statistics of a series with a reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResidualStats {
    /// Number of co-located observations.
    pub n: usize,
    /// `1 - SSR / TSS`, with the total sum of squares taken about the mean of
    /// the data. `None` for constant data.
    pub r_squared: Option<f64>,
    /// Statistics of the absolute residuals.
    pub absolute: ResidualSummary,
    /// Statistics of the percentage residuals; `None` when the reference is
    /// zero everywhere.
    pub percent: Option<ResidualSummary>,
}

/// Residuals of `data` against `reference`.
pub fn residuals(reference: &TimeSeries, data: &TimeSeries) -> Residuals {
    let joined = reference.inner_join(data);
    let absolute = joined.iter().map(|&(t, r, d)| (t, d - r)).collect();
    let percent = TimeSeries::from_observations(
        joined
            .iter()
            .map(|&(t, r, d)| (t, (r != 0.0).then(|| (d - r) / r * 100.0))),
    );
    Residuals { absolute, percent }
}

/// Agreement statistics of `data` against `reference`.
///
/// # Errors
///
/// Returns [`CompareError::InsufficientOverlap`] with fewer than
/// [`MIN_OVERLAP`] co-located observations.
#[tracing::instrument(skip_all, fields(n_ref = reference.observed_len(), n_data = data.observed_len()))]
pub fn residual_stats(
    reference: &TimeSeries,
    data: &TimeSeries,
) -> Result<ResidualStats, CompareError> {
    let joined = reference.inner_join(data);
    if joined.len() < MIN_OVERLAP {
        return Err(CompareError::InsufficientOverlap {
            n: joined.len(),
            min: MIN_OVERLAP,
        });
    }
    let res = residuals(reference, data);
    let r = res.absolute.observed_values();
    let r_p = res.percent.observed_values();

    let d: Vec<f64> = joined.iter().map(|&(_, _, d)| d).collect();
    let d_mean = firn_stats::mean(&d);
    let tss: f64 = d.iter().map(|v| (v - d_mean).powi(2)).sum();
    let ssr: f64 = r.iter().map(|v| v * v).sum();
    let r_squared = (tss > 0.0).then(|| 1.0 - ssr / tss);

    let absolute = ResidualSummary::from_residuals(&r).ok_or(CompareError::InsufficientOverlap {
        n: 0,
        min: MIN_OVERLAP,
    })?;
    let stats = ResidualStats {
        n: joined.len(),
        r_squared,
        absolute,
        percent: ResidualSummary::from_residuals(&r_p),
    };
    debug!(n = stats.n, rmse = absolute.rmse, me = absolute.me, "residual statistics");
    Ok(stats)
}
