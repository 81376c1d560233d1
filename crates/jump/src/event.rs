//! Records of corrections applied to a series.

use chrono::NaiveDateTime;

/// A detected and removed step discontinuity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscontinuityEvent {
    /// Timestamp of the first observation after the step.
    pub at: NaiveDateTime,
    /// Signed step size `value(at) - value(previous)` at detection time.
    pub magnitude: f64,
    /// Zero-based correction round in which the step was found.
    pub iteration: usize,
}

/// An isolated spike discarded before step correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransientOutlier {
    /// Timestamp of the discarded observation.
    pub at: NaiveDateTime,
    /// Discarded value.
    pub value: f64,
}
