//! Comparison error types.

/// Errors that can occur while comparing two series.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// Too few co-located observations.
    #[error("insufficient overlap: {n} common observations, need at least {min}")]
    InsufficientOverlap {
        /// Number of common observations.
        n: usize,
        /// Minimum number required.
        min: usize,
    },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Serializer diagnostics.
        reason: String,
    },
}
