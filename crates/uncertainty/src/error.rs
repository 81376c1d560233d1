//! Error types for firn-uncertainty.

/// Errors that can occur while propagating measurement uncertainty.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UncertaintyError {
    /// No uncertainty scenario was supplied.
    #[error("at least one uncertainty scenario is required")]
    EmptyScenarios,

    /// An instrument uncertainty is not a positive, finite number.
    #[error("invalid {quantity} uncertainty: {value} (must be positive and finite)")]
    InvalidUncertainty {
        /// Which measured quantity the uncertainty belongs to.
        quantity: &'static str,
        /// The offending value.
        value: f64,
    },

    /// A nominal density is not a positive, finite number.
    #[error("invalid nominal density: {value} kg/m³")]
    InvalidDensity {
        /// The offending value.
        value: f64,
    },
}
