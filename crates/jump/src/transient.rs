//! Removal of isolated spikes that return to the prior level.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::event::TransientOutlier;

type Entry = (NaiveDateTime, Option<f64>);

/// Drops one-sample excursions beyond `threshold` from `entries`.
///
/// Upward spikes are screened first, then downward spikes on the updated
/// sequence. A candidate is a transient when the following observation lies
/// more than `threshold` back on the other side of it. The final observation
/// has no successor and is never classified as transient.
pub(crate) fn drop_transients(entries: &mut Vec<Entry>, threshold: f64) -> Vec<TransientOutlier> {
    let mut dropped = screen(entries, |prev, cur, next| {
        cur - prev > threshold && next < cur - threshold
    });
    dropped.extend(screen(entries, |prev, cur, next| {
        cur - prev < -threshold && next > cur + threshold
    }));
    dropped
}

/// Removes every observation for which `is_spike(prev, cur, next)` holds,
/// judged on the sequence as it was before this pass.
fn screen<F>(entries: &mut Vec<Entry>, is_spike: F) -> Vec<TransientOutlier>
where
    F: Fn(f64, f64, f64) -> bool,
{
    let observed: Vec<(usize, f64)> = entries
        .iter()
        .enumerate()
        .filter_map(|(i, (_, v))| v.map(|x| (i, x)))
        .collect();

    let mut remove = vec![false; entries.len()];
    let mut dropped = Vec::new();
    for w in observed.windows(3) {
        let [(_, prev), (idx, cur), (_, next)] = [w[0], w[1], w[2]];
        if is_spike(prev, cur, next) {
            remove[idx] = true;
            let at = entries[idx].0;
            debug!(%at, value = cur, "dropping transient spike");
            dropped.push(TransientOutlier { at, value: cur });
        }
    }

    if !dropped.is_empty() {
        let mut flags = remove.into_iter();
        entries.retain(|_| !flags.next().unwrap_or(false));
    }
    dropped
}
