//! Error types for firn-series.

/// Errors that can occur when constructing series or cadences.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SeriesError {
    /// Timestamp and value vectors have different lengths.
    #[error("length mismatch: {times} timestamps, {values} values")]
    LengthMismatch {
        /// Number of timestamps.
        times: usize,
        /// Number of values.
        values: usize,
    },

    /// A sub-daily cadence does not tile the day.
    #[error("invalid cadence: {minutes} minutes does not divide a day")]
    InvalidCadence {
        /// Requested bucket width in minutes.
        minutes: u32,
    },

    /// Buckets are not strictly increasing or not aligned to the cadence.
    #[error("misaligned bucket at {start}: {reason}")]
    MisalignedBucket {
        /// Start of the offending bucket.
        start: chrono::NaiveDateTime,
        /// What went wrong.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn display_length_mismatch() {
        let err = SeriesError::LengthMismatch {
            times: 3,
            values: 2,
        };
        assert_eq!(err.to_string(), "length mismatch: 3 timestamps, 2 values");
    }

    #[test]
    fn display_invalid_cadence() {
        let err = SeriesError::InvalidCadence { minutes: 7 };
        assert_eq!(
            err.to_string(),
            "invalid cadence: 7 minutes does not divide a day"
        );
    }

    #[test]
    fn display_misaligned_bucket() {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let err = SeriesError::MisalignedBucket {
            start,
            reason: "not increasing".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "misaligned bucket at 2022-01-01 00:00:00: not increasing"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<SeriesError>();
    }
}
