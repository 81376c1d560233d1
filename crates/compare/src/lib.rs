//! # firn-compare
//!
//! Agreement statistics between co-located series, used to compare
//! receivers, processing variants and reference observations.
//!
//! Residuals are `data - reference` on the common timestamps, in absolute
//! terms and in percent of the reference. [`compare_series`] adds the Pearson
//! correlation and a linear dependency fit.

mod comparison;
mod error;
mod residuals;

pub use comparison::{Comparison, compare_series, to_json};
pub use error::CompareError;
pub use residuals::{MIN_OVERLAP, ResidualStats, ResidualSummary, Residuals, residual_stats, residuals};
