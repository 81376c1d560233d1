//! Bucket-wise mass/height ratio with plausibility filtering.

use firn_series::{AggregatedSeries, TimeSeries};
use tracing::debug;

use crate::config::DensityConfig;
use crate::error::DensityError;
use crate::{FIRN_ICE_TRANSITION_DENSITY, FRESH_SNOW_DENSITY};

/// Output of [`estimate_density`].
#[derive(Debug, Clone)]
pub struct DensityResult {
    /// Density (kg/m³) at every bucket shared by both inputs.
    pub density: TimeSeries,
    /// Buckets where the ratio was undefined (missing input or zero height).
    pub n_undefined: usize,
    /// Buckets where the ratio fell outside the plausible range.
    pub n_implausible: usize,
}

/// Whether `density` (kg/m³) lies in `[50, 830)`.
pub fn is_plausible_density(density: f64) -> bool {
    (FRESH_SNOW_DENSITY..FIRN_ICE_TRANSITION_DENSITY).contains(&density)
}

/// Divides bucket-aligned mass medians (mm w.e.) by height medians (m).
///
/// The output covers the buckets present in both inputs. A bucket is missing
/// when either median is missing, the height is zero, or the ratio is not a
/// plausible snow density.
///
/// # Errors
///
/// Returns [`DensityError::CadenceMismatch`] if the inputs are aggregated at
/// different cadences.
#[tracing::instrument(skip_all, fields(mass = mass.len(), height = height.len()))]
pub fn estimate_density(
    mass: &AggregatedSeries,
    height: &AggregatedSeries,
    config: &DensityConfig,
) -> Result<DensityResult, DensityError> {
    if mass.cadence() != height.cadence() {
        return Err(DensityError::CadenceMismatch {
            mass: mass.cadence(),
            height: height.cadence(),
        });
    }

    let (mass, height) = if config.interpolate_gaps() {
        (mass.with_interpolated_medians(), height.with_interpolated_medians())
    } else {
        (mass.clone(), height.clone())
    };

    let mut n_undefined = 0;
    let mut n_implausible = 0;
    let mut out = Vec::with_capacity(mass.len());
    for m in mass.buckets() {
        let Some(h) = height.get(m.start) else {
            continue;
        };
        let density = match (m.median, h.median) {
            (Some(mv), Some(hv)) if hv != 0.0 => Some(mv / hv).filter(|d| d.is_finite()),
            _ => None,
        };
        let value = match density {
            None => {
                n_undefined += 1;
                None
            }
            Some(d) if !is_plausible_density(d) => {
                n_implausible += 1;
                None
            }
            Some(d) => Some(d),
        };
        out.push((m.start, value));
    }

    debug!(n_undefined, n_implausible, "density estimated");
    Ok(DensityResult {
        density: TimeSeries::from_observations(out),
        n_undefined,
        n_implausible,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use firn_series::{Bucket, Cadence};

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 2, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn daily(medians: &[Option<f64>]) -> AggregatedSeries {
        let buckets = medians
            .iter()
            .enumerate()
            .map(|(i, m)| Bucket {
                start: day(1 + i as u32),
                median: *m,
                std_dev: None,
                count: 1,
            })
            .collect();
        AggregatedSeries::new(Cadence::daily(), buckets).unwrap()
    }

    #[test]
    fn zero_height_is_missing_not_infinite() {
        let result =
            estimate_density(&daily(&[Some(100.0)]), &daily(&[Some(0.0)]), &DensityConfig::new())
                .unwrap();
        assert_eq!(result.density.len(), 1);
        assert_eq!(result.density.values()[0], None);
        assert_eq!(result.n_undefined, 1);
    }

    #[test]
    fn below_fresh_snow_floor_is_dropped() {
        let result =
            estimate_density(&daily(&[Some(10.0)]), &daily(&[Some(1.0)]), &DensityConfig::new())
                .unwrap();
        assert_eq!(result.density.values()[0], None);
        assert_eq!(result.n_implausible, 1);
    }

    #[test]
    fn plausible_ratio_is_kept() {
        let result = estimate_density(
            &daily(&[Some(300.0), Some(830.0)]),
            &daily(&[Some(1.0), Some(1.0)]),
            &DensityConfig::new(),
        )
        .unwrap();
        assert_eq!(result.density.values(), &[Some(300.0), None]);
    }

    #[test]
    fn interpolation_bridges_height_gap() {
        let mass = daily(&[Some(200.0), Some(300.0), Some(400.0)]);
        let height = daily(&[Some(1.0), None, Some(1.0)]);
        let plain = estimate_density(&mass, &height, &DensityConfig::new()).unwrap();
        let bridged = estimate_density(
            &mass,
            &height,
            &DensityConfig::new().with_interpolate_gaps(true),
        )
        .unwrap();
        assert_eq!(plain.density.get(day(2)), None);
        assert_eq!(bridged.density.get(day(2)), Some(300.0));
    }

    #[test]
    fn cadence_mismatch_is_an_error() {
        let quarter = AggregatedSeries::empty(Cadence::minutes(15).unwrap());
        assert!(matches!(
            estimate_density(&daily(&[]), &quarter, &DensityConfig::new()),
            Err(DensityError::CadenceMismatch { .. })
        ));
    }

    #[test]
    fn plausibility_bounds() {
        assert!(is_plausible_density(50.0));
        assert!(!is_plausible_density(49.9));
        assert!(!is_plausible_density(830.0));
        assert!(!is_plausible_density(f64::NAN));
    }
}
