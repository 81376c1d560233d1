//! Low-level Parquet column building.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, TimestampMillisecondArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use chrono::NaiveDateTime;
use firn_series::{AggregatedSeries, TimeSeries};
use firn_uncertainty::ErrorProfile;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::IoError;

fn time_field() -> Field {
    Field::new("time", DataType::Timestamp(TimeUnit::Millisecond, None), false)
}

fn time_column(times: impl Iterator<Item = NaiveDateTime>) -> ArrayRef {
    Arc::new(TimestampMillisecondArray::from(
        times.map(|t| t.and_utc().timestamp_millis()).collect::<Vec<_>>(),
    ))
}

/// Schema of a plain series: `time`, nullable `value`.
pub(crate) fn series_schema() -> Schema {
    Schema::new(vec![
        time_field(),
        Field::new("value", DataType::Float64, true),
    ])
}

/// Converts a [`TimeSeries`] into a record batch matching [`series_schema`].
pub(crate) fn series_to_record_batch(
    series: &TimeSeries,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let columns: Vec<ArrayRef> = vec![
        time_column(series.times().iter().copied()),
        Arc::new(Float64Array::from(series.values().to_vec())),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Schema of an aggregated series: `time`, `median`, `std_dev`, `count`.
pub(crate) fn aggregated_schema() -> Schema {
    Schema::new(vec![
        time_field(),
        Field::new("median", DataType::Float64, true),
        Field::new("std_dev", DataType::Float64, true),
        Field::new("count", DataType::UInt64, false),
    ])
}

/// Converts an [`AggregatedSeries`] into a record batch matching
/// [`aggregated_schema`].
pub(crate) fn aggregated_to_record_batch(
    series: &AggregatedSeries,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let buckets = series.buckets();
    let columns: Vec<ArrayRef> = vec![
        time_column(buckets.iter().map(|b| b.start)),
        Arc::new(Float64Array::from(
            buckets.iter().map(|b| b.median).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            buckets.iter().map(|b| b.std_dev).collect::<Vec<_>>(),
        )),
        Arc::new(UInt64Array::from(
            buckets.iter().map(|b| b.count as u64).collect::<Vec<_>>(),
        )),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Schema of an error profile: `height`, then one column per relative and
/// absolute error label. Non-finite errors are written as nulls.
pub(crate) fn profile_schema(profile: &ErrorProfile) -> Schema {
    let mut fields = vec![Field::new("height", DataType::Float64, false)];
    fields.extend(
        profile
            .relative_labels()
            .iter()
            .chain(profile.absolute_labels())
            .map(|label| Field::new(label.as_str(), DataType::Float64, true)),
    );
    Schema::new(fields)
}

/// Converts an [`ErrorProfile`] into a record batch matching
/// [`profile_schema`].
pub(crate) fn profile_to_record_batch(
    profile: &ErrorProfile,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let finite_or_null = |v: &f64| v.is_finite().then_some(*v);
    let mut columns: Vec<ArrayRef> = vec![Arc::new(Float64Array::from(profile.heights().to_vec()))];
    for col in profile.relative().columns() {
        columns.push(Arc::new(Float64Array::from(
            col.iter().map(finite_or_null).collect::<Vec<_>>(),
        )));
    }
    for col in profile.absolute().columns() {
        columns.push(Arc::new(Float64Array::from(
            col.iter().map(finite_or_null).collect::<Vec<_>>(),
        )));
    }
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if file creation, batch writing, or file
/// finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
