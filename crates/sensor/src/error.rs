//! Error types for firn-sensor.

use firn_aggregate::AggregateError;
use firn_jump::JumpError;
use firn_outlier::OutlierError;

/// Errors that can occur while running a sensor chain.
///
/// Stage failures carry the name of the series being processed so that a
/// failing run can be traced to its input.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// Discontinuity correction failed.
    #[error("{series}: discontinuity correction failed: {source}")]
    Jump {
        /// Name of the series.
        series: String,
        /// Underlying error.
        #[source]
        source: JumpError,
    },

    /// Outlier filtering failed.
    #[error("{series}: outlier filter failed: {source}")]
    Outlier {
        /// Name of the series.
        series: String,
        /// Underlying error.
        #[source]
        source: OutlierError,
    },

    /// Aggregation failed.
    #[error("{series}: aggregation failed: {source}")]
    Aggregate {
        /// Name of the series.
        series: String,
        /// Underlying error.
        #[source]
        source: AggregateError,
    },

    /// No observation survived a stage that needs at least one.
    #[error("{series}: no observations left after {stage}")]
    Empty {
        /// Name of the series.
        series: String,
        /// Stage after which the series was empty.
        stage: &'static str,
    },

    /// Configuration parameter is invalid.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },
}
