//! # firn-density
//!
//! Bulk snow density from co-located mass (SWE) and height series.
//!
//! Mass is expressed in mm water equivalent, which equals kg/m², and height
//! in metres, so their ratio is a density in kg/m³. Ratios outside the
//! physically plausible range `[50, 830)` kg/m³ are dropped to missing, as
//! are undefined ratios (zero or missing height).
//!
//! Also provides conversions between SWE and height given a density, and
//! the density of freshly fallen snow from paired gains over an interval.

mod config;
mod convert;
mod error;
mod estimate;
mod new_snow;

pub use config::{DensityConfig, NewSnowConfig};
pub use convert::{DensitySource, height_to_swe, swe_to_height};
pub use error::DensityError;
pub use estimate::{DensityResult, estimate_density, is_plausible_density};
pub use new_snow::{NewSnowDensity, new_snow_density};

/// Lower plausibility bound: density of fresh, low-density snow (kg/m³).
pub const FRESH_SNOW_DENSITY: f64 = 50.0;

/// Upper plausibility bound (exclusive): firn–ice transition (kg/m³).
pub const FIRN_ICE_TRANSITION_DENSITY: f64 = 830.0;

/// Bulk density used when no measured density is available (kg/m³).
pub const DEFAULT_BULK_DENSITY: f64 = 408.0;
