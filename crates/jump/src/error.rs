//! Error types for firn-jump.

/// Errors that can occur during discontinuity correction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JumpError {
    /// Configuration parameter is invalid.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// The correction loop hit its iteration bound before converging.
    #[error("correction limit of {limit} reached with discontinuities remaining")]
    CorrectionLimit {
        /// Configured maximum number of corrections.
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_config() {
        let err = JumpError::InvalidConfig {
            reason: "threshold must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config: threshold must be positive"
        );
    }

    #[test]
    fn display_correction_limit() {
        let err = JumpError::CorrectionLimit { limit: 3 };
        assert_eq!(
            err.to_string(),
            "correction limit of 3 reached with discontinuities remaining"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<JumpError>();
    }
}
