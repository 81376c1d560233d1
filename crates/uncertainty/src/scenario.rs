//! Instrument uncertainty pairs.

use crate::error::UncertaintyError;

/// Assumed independent one-sigma uncertainties of the two instruments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uncertainty {
    sigma_mass: f64,
    sigma_height: f64,
}

impl Uncertainty {
    /// Creates a scenario from a mass uncertainty (mm w.e.) and a height
    /// uncertainty (m).
    ///
    /// # Errors
    ///
    /// Returns [`UncertaintyError::InvalidUncertainty`] unless both values are
    /// positive and finite.
    pub fn new(sigma_mass: f64, sigma_height: f64) -> Result<Self, UncertaintyError> {
        check("mass", sigma_mass)?;
        check("height", sigma_height)?;
        Ok(Self {
            sigma_mass,
            sigma_height,
        })
    }

    /// Mass uncertainty in mm w.e.
    pub fn sigma_mass(&self) -> f64 {
        self.sigma_mass
    }

    /// Height uncertainty in m.
    pub fn sigma_height(&self) -> f64 {
        self.sigma_height
    }

    /// Scenarios pairing `mass[i]` with `height[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`UncertaintyError::EmptyScenarios`] if the shorter slice is
    /// empty, or the first validation error of [`new`](Self::new).
    pub fn paired(mass: &[f64], height: &[f64]) -> Result<Vec<Self>, UncertaintyError> {
        let scenarios = mass
            .iter()
            .zip(height)
            .map(|(&m, &h)| Self::new(m, h))
            .collect::<Result<Vec<_>, _>>()?;
        if scenarios.is_empty() {
            return Err(UncertaintyError::EmptyScenarios);
        }
        Ok(scenarios)
    }

    /// Mass uncertainties of 10, 30, 50 and 90 mm w.e. at a height
    /// uncertainty of 0.1 m.
    pub fn mass_sweep() -> Vec<Self> {
        [10.0, 30.0, 50.0, 90.0]
            .into_iter()
            .map(|sigma_mass| Self {
                sigma_mass,
                sigma_height: 0.1,
            })
            .collect()
    }

    /// Height uncertainties of 0.1, 0.2, 0.3 and 0.4 m at a mass
    /// uncertainty of 30 mm w.e.
    pub fn height_sweep() -> Vec<Self> {
        [0.1, 0.2, 0.3, 0.4]
            .into_iter()
            .map(|sigma_height| Self {
                sigma_mass: 30.0,
                sigma_height,
            })
            .collect()
    }

    /// Column label, e.g. `m30_h0.1`.
    pub fn label(&self) -> String {
        format!("m{}_h{}", self.sigma_mass, self.sigma_height)
    }
}

fn check(quantity: &'static str, value: f64) -> Result<(), UncertaintyError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(UncertaintyError::InvalidUncertainty { quantity, value })
    }
}

/// First-order relative uncertainty of `mass / height`:
/// `sqrt((σ_m / mass)² + (σ_h / height)²)`.
///
/// Non-finite at `height == 0` or `mass == 0`.
pub fn relative_error(mass: f64, height: f64, uncertainty: &Uncertainty) -> f64 {
    ((uncertainty.sigma_mass / mass).powi(2) + (uncertainty.sigma_height / height).powi(2)).sqrt()
}
