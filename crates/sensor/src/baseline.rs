//! Baseline chain: receiver up-component to SWE.

use chrono::NaiveDateTime;
use firn_aggregate::{NoiseSummary, aggregate, count_per_bucket};
use firn_jump::{DiscontinuityEvent, TransientOutlier, correct_discontinuities};
use firn_outlier::{RollingStats, rolling_stats, sigma_clip};
use firn_series::{AggregatedSeries, TimeSeries};
use tracing::{info, warn};

use crate::config::BaselineConfig;
use crate::error::SensorError;

/// Every product of the baseline chain.
#[derive(Debug, Clone)]
pub struct BaselineOutput {
    /// Up-component after discontinuity correction (mm).
    pub corrected: TimeSeries,
    /// Discontinuities that were leveled.
    pub events: Vec<DiscontinuityEvent>,
    /// Spikes discarded before correction.
    pub transients: Vec<TransientOutlier>,
    /// Number of epochs rejected by the outlier filter.
    pub n_rejected: usize,
    /// SWE in mm w.e.: clipped, baseline length removed, time-shifted.
    pub swe: TimeSeries,
    /// Rolling median and spread of [`swe`](Self::swe).
    pub rolling: RollingStats,
    /// Aggregated SWE.
    pub daily: AggregatedSeries,
    /// Noise figures of [`daily`](Self::daily).
    pub noise: NoiseSummary,
    /// Number of fixed-ambiguity solutions per aggregation bucket, counted
    /// on the time-shifted epochs so buckets match [`daily`](Self::daily).
    pub epoch_counts: TimeSeries,
    /// Time of the smallest SWE value.
    pub time_of_min: Option<NaiveDateTime>,
}

/// Runs the baseline chain on quality-selected up-component epochs (mm).
///
/// Steps, in order: discontinuity correction, sigma clipping, subtraction of
/// the baseline length, time shift, rolling statistics, aggregation.
/// `fixed` holds the fixed-ambiguity epochs; only their count per bucket is
/// used.
///
/// # Errors
///
/// Returns [`SensorError::InvalidConfig`] or a stage error carrying the
/// series name.
#[tracing::instrument(skip(raw, fixed, config), fields(series = config.name(), n = raw.len()))]
pub fn process_baseline(
    raw: &TimeSeries,
    fixed: &TimeSeries,
    config: &BaselineConfig,
) -> Result<BaselineOutput, SensorError> {
    config.validate()?;
    let name = config.name();

    let correction =
        correct_discontinuities(raw, config.jump()).map_err(|source| SensorError::Jump {
            series: name.to_string(),
            source,
        })?;
    for e in &correction.events {
        info!(at = %e.at, magnitude = e.magnitude, "leveled discontinuity");
    }

    let outlier = |source| SensorError::Outlier {
        series: name.to_string(),
        source,
    };
    let clip = sigma_clip(&correction.corrected, config.clip()).map_err(outlier)?;
    if clip.retained.observed_len() == 0 && raw.observed_len() > 0 {
        warn!("outlier filter rejected every epoch");
    }

    let offset = config.baseline_length();
    let swe = clip
        .retained
        .map_values(|u| u - offset)
        .shift(config.time_shift());
    let rolling = rolling_stats(&swe, config.rolling_window()).map_err(outlier)?;

    let daily = aggregate(&swe, config.aggregate()).map_err(|source| SensorError::Aggregate {
        series: name.to_string(),
        source,
    })?;
    let noise = NoiseSummary::from_aggregated(&daily);
    let epoch_counts = count_per_bucket(
        &fixed.shift(config.time_shift()),
        config.aggregate().cadence(),
    );

    info!(
        events = correction.events.len(),
        transients = correction.transients.len(),
        rejected = clip.rejected.len(),
        buckets = daily.len(),
        mean_noise = ?noise.mean_noise,
        "baseline processed"
    );
    Ok(BaselineOutput {
        corrected: correction.corrected,
        events: correction.events,
        transients: correction.transients,
        n_rejected: clip.rejected.len(),
        time_of_min: swe.min_observed().map(|(t, _)| t),
        swe,
        rolling,
        daily,
        noise,
        epoch_counts,
    })
}
