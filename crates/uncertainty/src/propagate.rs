//! First-order propagation through the fitted mass–height model.

use firn_fit::{ExponentialParams, SampleGrid};
use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::UncertaintyError;
use crate::profile::ErrorProfile;
use crate::scenario::{Uncertainty, relative_error};

/// Density uncertainty implied by the fitted model for each scenario.
///
/// At every grid height `h` the model gives `mass(h)` and
/// `density(h) = mass(h) / h`; the relative error is
/// `sqrt((σ_m / mass(h))² + (σ_h / h)²)` and the absolute error is
/// `relative · density(h)`. One relative and one absolute column are
/// produced per scenario, labelled as in [`Uncertainty::label`].
///
/// # Errors
///
/// Returns [`UncertaintyError::EmptyScenarios`] if `scenarios` is empty.
#[tracing::instrument(skip(params, grid, scenarios), fields(n_heights = grid.len(), n_scenarios = scenarios.len()))]
pub fn propagate(
    params: &ExponentialParams,
    grid: &SampleGrid,
    scenarios: &[Uncertainty],
) -> Result<ErrorProfile, UncertaintyError> {
    if scenarios.is_empty() {
        return Err(UncertaintyError::EmptyScenarios);
    }
    let heights = Array1::from(grid.points());
    let mass = heights.mapv(|h| params.evaluate(h));
    let density = &mass / &heights;

    let shape = (heights.len(), scenarios.len());
    let relative = Array2::from_shape_fn(shape, |(i, j)| {
        relative_error(mass[i], heights[i], &scenarios[j])
    });
    let absolute = Array2::from_shape_fn(shape, |(i, j)| relative[[i, j]] * density[i]);

    let labels: Vec<String> = scenarios.iter().map(Uncertainty::label).collect();
    debug!("propagated {} scenarios", scenarios.len());
    Ok(ErrorProfile::new(
        heights,
        labels.iter().map(|l| format!("rel_{l}")).collect(),
        relative,
        labels.iter().map(|l| format!("abs_{l}")).collect(),
        absolute,
    ))
}

/// Density uncertainty at fixed nominal densities.
///
/// The relative error still follows the fitted `mass(h)` and a single
/// scenario; each absolute column scales it by one nominal density instead of
/// the model's `mass(h) / h`.
///
/// # Errors
///
/// - [`UncertaintyError::EmptyScenarios`] if `densities` is empty.
/// - [`UncertaintyError::InvalidDensity`] for a non-positive or non-finite
///   density.
#[tracing::instrument(skip(params, grid, densities), fields(n_heights = grid.len()))]
pub fn propagate_fixed_densities(
    params: &ExponentialParams,
    grid: &SampleGrid,
    uncertainty: Uncertainty,
    densities: &[f64],
) -> Result<ErrorProfile, UncertaintyError> {
    if densities.is_empty() {
        return Err(UncertaintyError::EmptyScenarios);
    }
    if let Some(&value) = densities.iter().find(|d| !(d.is_finite() && **d > 0.0)) {
        return Err(UncertaintyError::InvalidDensity { value });
    }
    let heights = Array1::from(grid.points());
    let relative = Array2::from_shape_fn((heights.len(), 1), |(i, _)| {
        relative_error(params.evaluate(heights[i]), heights[i], &uncertainty)
    });
    let absolute = Array2::from_shape_fn((heights.len(), densities.len()), |(i, j)| {
        relative[[i, 0]] * densities[j]
    });
    debug!("propagated {} nominal densities", densities.len());
    Ok(ErrorProfile::new(
        heights,
        vec![format!("rel_{}", uncertainty.label())],
        relative,
        densities.iter().map(|d| format!("abs_rho{d}")).collect(),
        absolute,
    ))
}
