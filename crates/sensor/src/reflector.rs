//! Reflector chain: reflector height to accumulation.

use firn_aggregate::{AggregateConfig, NoiseSummary, aggregate};
use firn_jump::{DiscontinuityEvent, TransientOutlier, correct_discontinuities};
use firn_outlier::sigma_clip;
use firn_series::{AggregatedSeries, TimeSeries};
use tracing::info;

use crate::config::ReflectorConfig;
use crate::error::SensorError;

/// Every product of the reflector chain.
#[derive(Debug, Clone)]
pub struct ReflectorOutput {
    /// Reflector height after discontinuity correction (mm).
    pub corrected: TimeSeries,
    /// Discontinuities that were leveled.
    pub events: Vec<DiscontinuityEvent>,
    /// Spikes discarded before correction.
    pub transients: Vec<TransientOutlier>,
    /// Number of epochs rejected by the outlier filter.
    pub n_rejected: usize,
    /// Medians of the clipped reflector height at the resample cadence,
    /// empty intervals dropped.
    pub resampled: TimeSeries,
    /// Accumulation in mm: first daily reflector height minus the resampled
    /// height, plus the initial accumulation.
    pub accumulation: TimeSeries,
    /// Aggregated accumulation.
    pub daily: AggregatedSeries,
    /// Noise figures of [`daily`](Self::daily).
    pub noise: NoiseSummary,
}

/// Runs the reflector chain on reflector heights (mm).
///
/// Steps, in order: discontinuity correction, sigma clipping, medians at the
/// resample cadence, conversion to accumulation, aggregation.
///
/// # Errors
///
/// Returns [`SensorError::InvalidConfig`], a stage error carrying the
/// series name, or [`SensorError::Empty`] if no epoch survives resampling.
#[tracing::instrument(skip(raw, config), fields(series = config.name(), n = raw.len()))]
pub fn process_reflector(
    raw: &TimeSeries,
    config: &ReflectorConfig,
) -> Result<ReflectorOutput, SensorError> {
    config.validate()?;
    let name = config.name();
    let aggregate_err = |source| SensorError::Aggregate {
        series: name.to_string(),
        source,
    };

    let correction =
        correct_discontinuities(raw, config.jump()).map_err(|source| SensorError::Jump {
            series: name.to_string(),
            source,
        })?;
    for e in &correction.events {
        info!(at = %e.at, magnitude = e.magnitude, "leveled discontinuity");
    }

    let clip = sigma_clip(&correction.corrected, config.clip()).map_err(|source| {
        SensorError::Outlier {
            series: name.to_string(),
            source,
        }
    })?;

    let resampled = aggregate(&clip.retained, &AggregateConfig::new(config.resample()))
        .map_err(aggregate_err)?
        .medians()
        .without_missing();

    let reference = aggregate(&resampled, config.aggregate())
        .map_err(aggregate_err)?
        .buckets()
        .first()
        .and_then(|b| b.median)
        .ok_or_else(|| SensorError::Empty {
            series: name.to_string(),
            stage: "resampling",
        })?;
    let initial = config.initial_accumulation();
    let accumulation = resampled.map_values(|rh| reference - rh + initial);

    let daily = aggregate(&accumulation, config.aggregate()).map_err(aggregate_err)?;
    let noise = NoiseSummary::from_aggregated(&daily);

    info!(
        events = correction.events.len(),
        rejected = clip.rejected.len(),
        reference,
        buckets = daily.len(),
        mean_noise = ?noise.mean_noise,
        "reflector processed"
    );
    Ok(ReflectorOutput {
        corrected: correction.corrected,
        events: correction.events,
        transients: correction.transients,
        n_rejected: clip.rejected.len(),
        resampled,
        accumulation,
        daily,
        noise,
    })
}
