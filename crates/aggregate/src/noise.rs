//! Sensor noise figures from bucket spreads.

use firn_series::AggregatedSeries;
use serde::Serialize;

/// Summary noise statistics of an aggregated series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoiseSummary {
    /// Mean of the per-bucket standard deviations.
    pub mean_noise: Option<f64>,
    /// Mean of `std_dev * 100 / median` over buckets with a non-zero median.
    pub mean_relative_noise_pct: Option<f64>,
    /// Number of buckets.
    pub n_buckets: usize,
    /// Number of buckets with a missing median.
    pub n_gaps: usize,
}

impl NoiseSummary {
    /// Computes the noise summary of `agg`, skipping missing or non-finite
    /// bucket statistics.
    pub fn from_aggregated(agg: &AggregatedSeries) -> Self {
        let spreads: Vec<f64> = agg.buckets().iter().filter_map(|b| b.std_dev).collect();
        let relative: Vec<f64> = agg
            .buckets()
            .iter()
            .filter_map(|b| match (b.std_dev, b.median) {
                (Some(s), Some(m)) if m != 0.0 => Some(s * 100.0 / m),
                _ => None,
            })
            .collect();

        Self {
            mean_noise: firn_stats::finite_mean(&spreads),
            mean_relative_noise_pct: firn_stats::finite_mean(&relative),
            n_buckets: agg.len(),
            n_gaps: agg.buckets().iter().filter(|b| b.median.is_none()).count(),
        }
    }
}
