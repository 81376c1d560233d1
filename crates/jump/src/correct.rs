//! Iterative step-discontinuity correction.

use chrono::NaiveDateTime;
use firn_series::TimeSeries;
use tracing::{debug, info};

use crate::config::JumpConfig;
use crate::error::JumpError;
use crate::event::{DiscontinuityEvent, TransientOutlier};
use crate::transient;

/// Output of [`correct_discontinuities`].
#[derive(Debug, Clone)]
pub struct CorrectionResult {
    /// Series with transients removed and every step leveled.
    pub corrected: TimeSeries,
    /// Steps that were removed, in detection order.
    pub events: Vec<DiscontinuityEvent>,
    /// Spikes discarded before correction.
    pub transients: Vec<TransientOutlier>,
}

/// Removes step discontinuities from `series`.
///
/// After transient removal, the earliest step exceeding the threshold in the
/// configured direction is located and its magnitude subtracted from that
/// observation and every later one. This repeats until no qualifying step
/// remains. Missing entries are carried through unchanged and steps are
/// measured between consecutive observed values.
///
/// Running the corrector on its own output finds no further events.
///
/// # Errors
///
/// Returns [`JumpError::InvalidConfig`] for an invalid configuration, or
/// [`JumpError::CorrectionLimit`] if more than `max_corrections` steps are
/// found.
#[tracing::instrument(skip(series, config), fields(n = series.len(), threshold = config.threshold()))]
pub fn correct_discontinuities(
    series: &TimeSeries,
    config: &JumpConfig,
) -> Result<CorrectionResult, JumpError> {
    config.validate()?;

    let mut entries: Vec<(NaiveDateTime, Option<f64>)> = series.iter().collect();
    let transients = if config.remove_transients() {
        transient::drop_transients(&mut entries, config.threshold())
    } else {
        Vec::new()
    };

    let mut events: Vec<DiscontinuityEvent> = Vec::new();
    let mut from = 0;
    while let Some((pos, step)) = first_step(&entries, from, config) {
        if events.len() == config.max_corrections() {
            return Err(JumpError::CorrectionLimit {
                limit: config.max_corrections(),
            });
        }
        for (_, v) in entries[pos..].iter_mut() {
            if let Some(x) = v.as_mut() {
                *x -= step;
            }
        }
        let at = entries[pos].0;
        info!(%at, magnitude = step, "corrected discontinuity");
        events.push(DiscontinuityEvent {
            at,
            magnitude: step,
            iteration: events.len(),
        });
        from = pos;
    }

    debug!(
        events = events.len(),
        transients = transients.len(),
        "discontinuity correction finished"
    );

    Ok(CorrectionResult {
        corrected: TimeSeries::from_observations(entries),
        events,
        transients,
    })
}

/// Position and size of the first qualifying step at or after `from`.
///
/// Observations before `from` are already level with each other, so the
/// scan starts there with no predecessor.
fn first_step(
    entries: &[(NaiveDateTime, Option<f64>)],
    from: usize,
    config: &JumpConfig,
) -> Option<(usize, f64)> {
    let mut prev: Option<f64> = None;
    for (i, (_, v)) in entries.iter().enumerate().skip(from) {
        let Some(x) = *v else { continue };
        if let Some(p) = prev {
            let step = x - p;
            if config.direction().exceeds(step, config.threshold()) {
                return Some((i, step));
            }
        }
        prev = Some(x);
    }
    None
}
