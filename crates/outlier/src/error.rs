//! Error types for firn-outlier.

/// Errors that can occur while filtering outliers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OutlierError {
    /// Configuration parameter is invalid.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },
}
