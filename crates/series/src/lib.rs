//! # firn-series
//!
//! Time-indexed series shared by every stage of the firn pipeline.
//!
//! A [`TimeSeries`] is an ordered sequence of `(timestamp, value)` pairs with
//! strictly increasing timestamps and an explicit missing representation
//! (`None`). Stages never mutate their input; every transformation returns a
//! new series.
//!
//! [`AggregatedSeries`] carries the per-bucket robust summary produced at a
//! fixed [`Cadence`].

mod aggregated;
mod cadence;
mod error;
mod series;

pub use aggregated::{AggregatedSeries, Bucket};
pub use cadence::Cadence;
pub use error::SeriesError;
pub use series::TimeSeries;
