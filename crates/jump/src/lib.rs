//! # firn-jump
//!
//! Detection and removal of step discontinuities in GNSS-derived series.
//!
//! Antenna re-mounts and reflector changes show up as abrupt, persistent
//! level shifts. The corrector first discards isolated transient spikes and
//! then repeatedly levels the earliest remaining step until no step beyond
//! the threshold is left.
//!
//! ```mermaid
//! flowchart LR
//!     A[TimeSeries] --> B[drop transients]
//!     B --> C{step > T?}
//!     C -- yes --> D[subtract step from all later values]
//!     D --> C
//!     C -- no --> E[CorrectionResult]
//! ```

mod config;
mod correct;
mod error;
mod event;
mod transient;

pub use config::{JumpConfig, JumpDirection};
pub use correct::{CorrectionResult, correct_discontinuities};
pub use error::JumpError;
pub use event::{DiscontinuityEvent, TransientOutlier};
