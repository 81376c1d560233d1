//! # firn-outlier
//!
//! Local, adaptive rejection of measurement noise.
//!
//! Snow accumulation is strongly non-stationary, so a single global
//! threshold is useless. Each observation is instead judged against the
//! median and standard deviation of a trailing calendar-time window ending
//! at its own timestamp.
//!
//! - [`sigma_clip`]: keep `v` iff `median - k·σ <= v <= median + k·σ`.
//! - [`rolling_stats`]: the rolling median and spread as series.
//!
//! Filters only ever drop observations; retained values are never altered.

mod config;
mod error;
mod rolling;
mod sigma_clip;
mod window;

pub use config::SigmaClipConfig;
pub use error::OutlierError;
pub use rolling::{RollingStats, rolling_stats};
pub use sigma_clip::{ClipResult, sigma_clip};
