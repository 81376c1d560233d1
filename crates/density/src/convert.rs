//! Conversions between snow water equivalent and snow height.

use firn_series::TimeSeries;

use crate::error::DensityError;

/// Density used for a SWE/height conversion.
#[derive(Debug, Clone, Copy)]
pub enum DensitySource<'a> {
    /// A single bulk density (kg/m³) for all timestamps.
    Constant(f64),
    /// A density series (kg/m³), interpolated linearly in time.
    Series(&'a TimeSeries),
}

impl DensitySource<'_> {
    fn validate(&self) -> Result<(), DensityError> {
        match self {
            Self::Constant(d) if !d.is_finite() || *d <= 0.0 => {
                Err(DensityError::InvalidDensity { value: *d })
            }
            _ => Ok(()),
        }
    }

    fn at(&self, t: chrono::NaiveDateTime) -> Option<f64> {
        match self {
            Self::Constant(d) => Some(*d),
            Self::Series(s) => s.interpolate_at(t).filter(|d| *d > 0.0),
        }
    }
}

/// Converts SWE (mm w.e.) to snow height (m).
///
/// Timestamps outside the span of a density series become missing.
///
/// # Errors
///
/// Returns [`DensityError::InvalidDensity`] for a non-positive constant.
pub fn swe_to_height(swe: &TimeSeries, density: DensitySource<'_>) -> Result<TimeSeries, DensityError> {
    density.validate()?;
    Ok(TimeSeries::from_observations(swe.iter().map(|(t, v)| {
        (t, v.zip(density.at(t)).map(|(m, d)| m / d))
    })))
}

/// Converts snow height (m) to SWE (mm w.e.).
///
/// # Errors
///
/// Returns [`DensityError::InvalidDensity`] for a non-positive constant.
pub fn height_to_swe(
    height: &TimeSeries,
    density: DensitySource<'_>,
) -> Result<TimeSeries, DensityError> {
    density.validate()?;
    Ok(TimeSeries::from_observations(height.iter().map(|(t, v)| {
        (t, v.zip(density.at(t)).map(|(h, d)| h * d))
    })))
}
