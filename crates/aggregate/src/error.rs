//! Error types for firn-aggregate.

use firn_series::SeriesError;

/// Errors that can occur during aggregation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AggregateError {
    /// Configuration parameter is invalid.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Bucket construction failed.
    #[error(transparent)]
    Series(#[from] SeriesError),
}
