//! Error types for firn-fit.

/// Errors that can occur while fitting a curve model.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FitError {
    /// Too few samples to determine the model with uncertainties.
    #[error("insufficient data: got {n} samples, need at least {min}")]
    InsufficientData {
        /// Number of usable samples supplied.
        n: usize,
        /// Minimum number required.
        min: usize,
    },

    /// Input contains NaN or infinite values.
    #[error("input contains non-finite values")]
    NonFiniteData,

    /// Input cannot identify the model parameters.
    #[error("degenerate data: {reason}")]
    DegenerateData {
        /// Why the data is degenerate.
        reason: String,
    },

    /// The optimizer did not converge.
    #[error("{model} fit did not converge: {reason}")]
    ConvergenceFailed {
        /// Name of the model being fitted.
        model: &'static str,
        /// Optimizer diagnostics.
        reason: String,
    },

    /// Configuration parameter is invalid.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_insufficient_data() {
        let err = FitError::InsufficientData { n: 2, min: 3 };
        assert_eq!(
            err.to_string(),
            "insufficient data: got 2 samples, need at least 3"
        );
    }

    #[test]
    fn display_non_finite() {
        assert_eq!(
            FitError::NonFiniteData.to_string(),
            "input contains non-finite values"
        );
    }

    #[test]
    fn display_degenerate() {
        let err = FitError::DegenerateData {
            reason: "constant response".to_string(),
        };
        assert_eq!(err.to_string(), "degenerate data: constant response");
    }

    #[test]
    fn display_convergence_failed() {
        let err = FitError::ConvergenceFailed {
            model: "exponential",
            reason: "max iterations reached".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "exponential fit did not converge: max iterations reached"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<FitError>();
    }
}
