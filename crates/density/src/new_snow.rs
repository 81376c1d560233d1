//! Density of freshly fallen snow from paired gains.

use firn_series::{AggregatedSeries, TimeSeries};
use tracing::debug;

use crate::config::NewSnowConfig;
use crate::error::DensityError;
use crate::estimate::is_plausible_density;

/// Output of [`new_snow_density`], indexed by the interval centre.
#[derive(Debug, Clone)]
pub struct NewSnowDensity {
    /// Height gain (m) across the interval; missing below the minimum gain.
    pub height_gain: TimeSeries,
    /// Mass gain (mm w.e.) across the same interval.
    pub mass_gain: TimeSeries,
    /// Density of the new snow (kg/m³); missing where undefined or
    /// implausible.
    pub density: TimeSeries,
}

/// Computes the density of new snow over centred intervals.
///
/// For every bucket `t` with buckets `interval / 2` steps on either side,
/// the gains `h(t + k) - h(t - k)` and `m(t + k) - m(t - k)` are formed.
/// Height gains below `min_gain` are treated as no new snow.
///
/// # Errors
///
/// Returns [`DensityError::InvalidConfig`] for an invalid configuration or
/// [`DensityError::CadenceMismatch`] for inputs at different cadences.
#[tracing::instrument(skip_all, fields(interval = config.interval()))]
pub fn new_snow_density(
    height: &AggregatedSeries,
    mass: &AggregatedSeries,
    config: &NewSnowConfig,
) -> Result<NewSnowDensity, DensityError> {
    config.validate()?;
    if mass.cadence() != height.cadence() {
        return Err(DensityError::CadenceMismatch {
            mass: mass.cadence(),
            height: height.cadence(),
        });
    }

    let half = config.interval() / 2;
    let offset = height.cadence().step() * config.half_steps()?;
    let buckets = height.buckets();

    let mut height_gain = Vec::new();
    let mut mass_gain = Vec::new();
    let mut density = Vec::new();
    for i in half..buckets.len().saturating_sub(half) {
        let centre = buckets[i].start;
        let h_gain = buckets[i + half]
            .median
            .zip(buckets[i - half].median)
            .map(|(h2, h1)| h2 - h1)
            .filter(|g| *g >= config.min_gain());
        let m_gain = mass
            .get(centre + offset)
            .and_then(|b| b.median)
            .zip(mass.get(centre - offset).and_then(|b| b.median))
            .map(|(m2, m1)| m2 - m1);
        let d = h_gain
            .zip(m_gain)
            .map(|(h, m)| m / h)
            .filter(|d| is_plausible_density(*d));

        height_gain.push((centre, h_gain));
        mass_gain.push((centre, m_gain));
        density.push((centre, d));
    }

    let events = density.iter().filter(|(_, d)| d.is_some()).count();
    debug!(events, "new snow density computed");

    Ok(NewSnowDensity {
        height_gain: TimeSeries::from_observations(height_gain),
        mass_gain: TimeSeries::from_observations(mass_gain),
        density: TimeSeries::from_observations(density),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime};
    use firn_series::{Bucket, Cadence};

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn daily(medians: &[f64]) -> AggregatedSeries {
        let buckets = medians
            .iter()
            .enumerate()
            .map(|(i, m)| Bucket {
                start: day(1 + i as u32),
                median: Some(*m),
                std_dev: None,
                count: 1,
            })
            .collect();
        AggregatedSeries::new(Cadence::daily(), buckets).unwrap()
    }

    #[test]
    fn storm_density() {
        // 0.2 m of snow with 20 mm w.e. falls between day 2 and day 4.
        let height = daily(&[1.0, 1.0, 1.1, 1.2, 1.2]);
        let mass = daily(&[300.0, 300.0, 310.0, 320.0, 320.0]);
        let config = NewSnowConfig::new().with_interval(2);
        let out = new_snow_density(&height, &mass, &config).unwrap();

        assert_eq!(out.density.len(), 3);
        assert_relative_eq!(out.height_gain.get(day(3)).unwrap(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(out.density.get(day(3)).unwrap(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn small_gain_is_not_new_snow() {
        let height = daily(&[1.0, 1.01, 1.02]);
        let mass = daily(&[300.0, 305.0, 310.0]);
        let out = new_snow_density(&height, &mass, &NewSnowConfig::new().with_interval(2)).unwrap();
        assert_eq!(out.height_gain.get(day(2)), None);
        assert_eq!(out.density.get(day(2)), None);
        assert_relative_eq!(out.mass_gain.get(day(2)).unwrap(), 10.0);
    }

    #[test]
    fn too_short_series_yields_nothing() {
        let out =
            new_snow_density(&daily(&[1.0]), &daily(&[1.0]), &NewSnowConfig::new()).unwrap();
        assert!(out.density.is_empty());
    }
}
