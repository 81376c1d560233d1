//! Reading raw epoch series from Parquet.

use std::path::Path;

use chrono::NaiveDateTime;
use firn_series::TimeSeries;
use tracing::{debug, info};

use crate::error::IoError;
use crate::parquet_read;

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Column layout of a raw epoch file.
///
/// Use the builder methods (`with_*`) to customise column names. The
/// [`Default`] implementation expects `time` and `value` columns, no quality
/// column and unit scale.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Timestamp column.
    time_column: String,
    /// Measurement column.
    value_column: String,
    /// Optional integer solution-quality column.
    quality_column: Option<String>,
    /// Factor applied to every value on read (e.g. 1000 for m to mm).
    value_scale: f64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            time_column: "time".into(),
            value_column: "value".into(),
            quality_column: None,
            value_scale: 1.0,
        }
    }
}

impl ReaderConfig {
    /// Set the timestamp column name.
    pub fn with_time_column(mut self, name: impl Into<String>) -> Self {
        self.time_column = name.into();
        self
    }

    /// Set the measurement column name.
    pub fn with_value_column(mut self, name: impl Into<String>) -> Self {
        self.value_column = name.into();
        self
    }

    /// Set the quality column name, or `None` to skip it.
    pub fn with_quality_column(mut self, name: Option<impl Into<String>>) -> Self {
        self.quality_column = name.map(Into::into);
        self
    }

    /// Set the value scale factor.
    pub fn with_value_scale(mut self, scale: f64) -> Self {
        self.value_scale = scale;
        self
    }

    /// Timestamp column name.
    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    /// Measurement column name.
    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    /// Quality column name, if any.
    pub fn quality_column(&self) -> Option<&str> {
        self.quality_column.as_deref()
    }

    /// Value scale factor.
    pub fn value_scale(&self) -> f64 {
        self.value_scale
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if a column name is empty or the scale
    /// is zero or not finite.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut errors: Vec<String> = Vec::new();
        if self.time_column.is_empty() {
            errors.push("time_column must not be empty".to_string());
        }
        if self.value_column.is_empty() {
            errors.push("value_column must not be empty".to_string());
        }
        if self.quality_column.as_deref() == Some("") {
            errors.push("quality_column must not be empty".to_string());
        }
        if !self.value_scale.is_finite() || self.value_scale == 0.0 {
            errors.push(format!(
                "value_scale must be finite and non-zero, got {}",
                self.value_scale
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: errors.len(),
                details: errors.join("; "),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// RawEpochs
// ---------------------------------------------------------------------------

/// Quality flag of a fixed-ambiguity solution.
pub const FIXED_AMBIGUITY: i32 = 1;

/// Epochs as read from disk, before any quality selection.
///
/// Rows keep the file order; [`into_series`](Self::into_series) and
/// [`select_quality`](Self::select_quality) sort and de-duplicate.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEpochs {
    times: Vec<NaiveDateTime>,
    values: Vec<Option<f64>>,
    quality: Option<Vec<Option<i32>>>,
}

impl RawEpochs {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether no rows were read.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Timestamps in file order.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Scaled values in file order.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Quality flags in file order, if a quality column was read.
    pub fn quality(&self) -> Option<&[Option<i32>]> {
        self.quality.as_deref()
    }

    /// Series of all epochs.
    pub fn into_series(self) -> TimeSeries {
        TimeSeries::from_observations(self.times.into_iter().zip(self.values))
    }

    /// Series of the epochs whose quality flag is in `accepted`.
    ///
    /// Without a quality column every epoch is kept. Epochs with a null flag
    /// are dropped.
    pub fn select_quality(&self, accepted: &[i32]) -> TimeSeries {
        let Some(quality) = &self.quality else {
            return TimeSeries::from_observations(
                self.times.iter().copied().zip(self.values.iter().copied()),
            );
        };
        TimeSeries::from_observations(
            self.times
                .iter()
                .zip(&self.values)
                .zip(quality)
                .filter(|(_, q)| q.is_some_and(|q| accepted.contains(&q)))
                .map(|((t, v), _)| (*t, *v)),
        )
    }

    /// Series of the fixed-ambiguity epochs ([`FIXED_AMBIGUITY`]).
    ///
    /// Float solutions are excluded even when they are accepted for
    /// processing. Without a quality column every epoch counts as fixed.
    pub fn fixed_solutions(&self) -> TimeSeries {
        self.select_quality(&[FIXED_AMBIGUITY])
    }
}

// ---------------------------------------------------------------------------
// read_epochs
// ---------------------------------------------------------------------------

/// Read a raw epoch series from a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::Validation`] for an invalid configuration,
/// [`IoError::FileNotFound`] if the file does not exist,
/// [`IoError::MissingColumn`] if a configured column is absent, or
/// [`IoError::Parquet`]/[`IoError::InvalidTime`] if a column cannot be
/// converted.
#[tracing::instrument(skip(config), fields(path = %path.display()))]
pub fn read_epochs(path: &Path, config: &ReaderConfig) -> Result<RawEpochs, IoError> {
    config.validate()?;
    let batches = parquet_read::read_batches(path)?;
    debug!(n_batches = batches.len(), "read record batches");

    let mut times: Vec<NaiveDateTime> = Vec::new();
    let mut values: Vec<Option<f64>> = Vec::new();
    let mut quality: Option<Vec<Option<i32>>> = config.quality_column().map(|_| Vec::new());

    for batch in &batches {
        let time_col = parquet_read::column(batch, config.time_column(), path)?;
        times.extend(parquet_read::time_values(time_col)?);

        let value_col = parquet_read::column(batch, config.value_column(), path)?;
        let scale = config.value_scale();
        values.extend(
            parquet_read::float_values(value_col)?
                .into_iter()
                .map(|v| v.map(|x| x * scale)),
        );

        if let (Some(name), Some(q)) = (config.quality_column(), quality.as_mut()) {
            let quality_col = parquet_read::column(batch, name, path)?;
            q.extend(parquet_read::int_values(quality_col)?);
        }
    }

    info!(n_epochs = times.len(), "read raw epochs");
    Ok(RawEpochs {
        times,
        values,
        quality,
    })
}
