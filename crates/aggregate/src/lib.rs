//! # firn-aggregate
//!
//! Reduces a filtered, irregularly sampled series to one
//! value-with-uncertainty per fixed bucket (a day, or a sub-daily interval
//! aligned to midnight) so that sensors can be compared on a common cadence.
//!
//! Every bucket between the first and last observation is emitted, empty
//! buckets carrying a missing median. The mean of the bucket spreads is the
//! canonical noise figure of a sensor, see [`NoiseSummary`].

mod config;
mod error;
mod noise;
mod resample;

pub use config::AggregateConfig;
pub use error::AggregateError;
pub use noise::NoiseSummary;
pub use resample::{aggregate, count_per_bucket};
