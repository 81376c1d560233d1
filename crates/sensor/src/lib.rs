//! # firn-sensor
//!
//! Stage chains turning raw sensor epochs into calibrated series.
//!
//! - [`process_baseline`]: GNSS baseline up-component → SWE. Antenna mast
//!   raises show up as falling steps.
//! - [`process_reflector`]: GNSS reflector height → accumulation. Mast raises
//!   show up as rising steps.
//!
//! Each chain runs sequentially on one series; independent series share no
//! state and may run in parallel.
//!
//! ```mermaid
//! flowchart LR
//!     A[raw epochs] --> B[discontinuity correction]
//!     B --> C[sigma clip]
//!     C --> D[calibration]
//!     D --> E[aggregation]
//!     E --> F[noise summary]
//! ```

mod baseline;
mod config;
mod error;
mod reflector;

pub use baseline::{BaselineOutput, process_baseline};
pub use config::{
    BASELINE_JUMP_THRESHOLD, BaselineConfig, DEFAULT_SIGMA, REFLECTOR_JUMP_THRESHOLD,
    ReflectorConfig,
};
pub use error::SensorError;
pub use reflector::{ReflectorOutput, process_reflector};
