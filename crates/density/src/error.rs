//! Error types for firn-density.

use firn_series::Cadence;

/// Errors that can occur during density estimation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DensityError {
    /// Mass and height series are aggregated at different cadences.
    #[error("cadence mismatch: mass at {mass:?}, height at {height:?}")]
    CadenceMismatch {
        /// Cadence of the mass series.
        mass: Cadence,
        /// Cadence of the height series.
        height: Cadence,
    },

    /// A constant density is not positive and finite.
    #[error("invalid density: {value}")]
    InvalidDensity {
        /// The offending density.
        value: f64,
    },

    /// Configuration parameter is invalid.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },
}
