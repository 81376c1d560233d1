//! Low-level Parquet reading and column extraction.

use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, RecordBatch};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int32Type, TimeUnit, TimestampMillisecondType};
use chrono::{DateTime, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::IoError;

/// Reads all record batches from a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or
/// [`IoError::Parquet`] if the file cannot be opened or read.
pub(crate) fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let batches: Vec<RecordBatch> = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(batches)
}

/// Looks up a column by name.
///
/// # Errors
///
/// Returns [`IoError::MissingColumn`] if the batch has no such column.
pub(crate) fn column<'a>(
    batch: &'a RecordBatch,
    name: &str,
    path: &Path,
) -> Result<&'a ArrayRef, IoError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| IoError::MissingColumn {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
}

/// Extracts a time column as naive UTC timestamps.
///
/// Any column Arrow can cast to a millisecond timestamp is accepted
/// (timestamps of any unit or zone, dates, ISO-8601 strings).
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if the cast fails, or
/// [`IoError::InvalidTime`] for null or out-of-range timestamps.
pub(crate) fn time_values(array: &ArrayRef) -> Result<Vec<NaiveDateTime>, IoError> {
    let cast_array = cast(array, &DataType::Timestamp(TimeUnit::Millisecond, None))?;
    let ts = cast_array.as_primitive::<TimestampMillisecondType>();
    (0..ts.len())
        .map(|i| {
            if ts.is_null(i) {
                return Err(IoError::InvalidTime {
                    reason: format!("null timestamp at row {i}"),
                });
            }
            let ms = ts.value(i);
            DateTime::from_timestamp_millis(ms)
                .map(|dt| dt.naive_utc())
                .ok_or_else(|| IoError::InvalidTime {
                    reason: format!("timestamp {ms} ms out of range"),
                })
        })
        .collect()
}

/// Extracts a numeric column as `f64`, nulls as `None`.
pub(crate) fn float_values(array: &ArrayRef) -> Result<Vec<Option<f64>>, IoError> {
    let cast_array = cast(array, &DataType::Float64)?;
    let values = cast_array.as_primitive::<Float64Type>();
    Ok(values.iter().collect())
}

/// Extracts an integer column as `i32`, nulls as `None`.
pub(crate) fn int_values(array: &ArrayRef) -> Result<Vec<Option<i32>>, IoError> {
    let cast_array = cast(array, &DataType::Int32)?;
    let values = cast_array.as_primitive::<Int32Type>();
    Ok(values.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow::array::{Float32Array, Int64Array, StringArray, TimestampSecondArray};
    use chrono::NaiveDate;

    #[test]
    fn casts_second_timestamps() {
        let array: ArrayRef = Arc::new(TimestampSecondArray::from(vec![0, 86_400]));
        let times = time_values(&array).unwrap();
        assert_eq!(
            times[1],
            NaiveDate::from_ymd_opt(1970, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn casts_iso_strings() {
        let array: ArrayRef = Arc::new(StringArray::from(vec!["2022-01-05T12:30:00"]));
        let times = time_values(&array).unwrap();
        assert_eq!(
            times[0],
            NaiveDate::from_ymd_opt(2022, 1, 5)
                .unwrap()
                .and_hms_opt(12, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn null_timestamp_is_rejected() {
        let array: ArrayRef = Arc::new(TimestampSecondArray::from(vec![Some(0), None]));
        assert!(matches!(
            time_values(&array),
            Err(IoError::InvalidTime { .. })
        ));
    }

    #[test]
    fn floats_keep_nulls() {
        let array: ArrayRef = Arc::new(Float32Array::from(vec![Some(1.5), None]));
        assert_eq!(float_values(&array).unwrap(), vec![Some(1.5), None]);
    }

    #[test]
    fn integers_are_narrowed() {
        let array: ArrayRef = Arc::new(Int64Array::from(vec![1, 2, 5]));
        assert_eq!(int_values(&array).unwrap(), vec![Some(1), Some(2), Some(5)]);
    }
}
