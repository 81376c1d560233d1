//! Rolling median ± k·σ rejection.

use chrono::NaiveDateTime;
use firn_series::TimeSeries;
use tracing::debug;

use crate::config::SigmaClipConfig;
use crate::error::OutlierError;
use crate::window::TrailingWindow;

/// Output of [`sigma_clip`].
#[derive(Debug, Clone)]
pub struct ClipResult {
    /// Observations that passed, with their original values.
    pub retained: TimeSeries,
    /// Observations that were rejected.
    pub rejected: Vec<(NaiveDateTime, f64)>,
}

impl ClipResult {
    /// Fraction of observed values that were rejected.
    pub fn rejection_rate(&self) -> f64 {
        let total = self.retained.len() + self.rejected.len();
        if total == 0 {
            return 0.0;
        }
        self.rejected.len() as f64 / total as f64
    }
}

/// Rejects observations outside `median ± k·σ` of their trailing window.
///
/// The window for an observation at `t` covers `(t - W, t]` of the input
/// series, the observation itself included. Bounds are inclusive. With fewer
/// than two observations in the window, `σ` is zero and only a value equal
/// to the window median survives. Missing entries are dropped.
///
/// # Errors
///
/// Returns [`OutlierError::InvalidConfig`] if the configuration is invalid.
#[tracing::instrument(skip(series, config), fields(n = series.len(), sigma = config.sigma()))]
pub fn sigma_clip(series: &TimeSeries, config: &SigmaClipConfig) -> Result<ClipResult, OutlierError> {
    config.validate()?;

    let mut window = TrailingWindow::new(config.window());
    let mut retained = Vec::with_capacity(series.len());
    let mut rejected = Vec::new();

    for (t, v) in series.observed() {
        window.push(t, v);
        let Some(median) = window.median() else {
            continue;
        };
        let half_width = config.sigma() * window.std_dev();
        if v >= median - half_width && v <= median + half_width {
            retained.push((t, v));
        } else {
            rejected.push((t, v));
        }
    }

    debug!(
        retained = retained.len(),
        rejected = rejected.len(),
        "sigma clip finished"
    );

    Ok(ClipResult {
        retained: retained.into_iter().collect(),
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(values: &[f64]) -> TimeSeries {
        let t0 = NaiveDate::from_ymd_opt(2022, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (t0 + Duration::hours(i as i64), *v))
            .collect()
    }

    #[test]
    fn first_point_survives_degenerate_window() {
        let s = series(&[5.0]);
        let result = sigma_clip(&s, &SigmaClipConfig::new()).unwrap();
        assert_eq!(result.retained.observed_values(), vec![5.0]);
    }

    #[test]
    fn isolated_points_equal_their_median() {
        // The previous point sits exactly on the open left edge, so each
        // window holds a single value equal to its own median.
        let s = series(&[1.0, 2.0]);
        let config = SigmaClipConfig::new().with_window(Duration::hours(1));
        let result = sigma_clip(&s, &config).unwrap();
        assert_eq!(result.retained.len(), 2);
    }

    #[test]
    fn two_point_window_keeps_both() {
        // median 1.5, sd 0.707; k=1 bounds [0.79, 2.21]
        let s = series(&[1.0, 2.0]);
        let config = SigmaClipConfig::new().with_sigma(1.0);
        let result = sigma_clip(&s, &config).unwrap();
        assert_eq!(result.retained.len(), 2);
        assert!(result.rejected.is_empty());
    }

    #[test]
    fn spike_is_rejected() {
        let mut values: Vec<f64> = (0..48).map(|i| 100.0 + (i % 3) as f64).collect();
        values[30] = 400.0;
        let result = sigma_clip(&series(&values), &SigmaClipConfig::new()).unwrap();
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].1, 400.0);
        assert_eq!(result.retained.len(), 47);
    }

    #[test]
    fn invalid_config_fails_fast() {
        let config = SigmaClipConfig::new().with_sigma(-1.0);
        assert!(sigma_clip(&series(&[1.0]), &config).is_err());
    }

    #[test]
    fn rejection_rate_counts_both_sides() {
        let mut values: Vec<f64> = (0..9).map(|i| 10.0 + (i % 2) as f64).collect();
        values.push(1000.0);
        let result = sigma_clip(&series(&values), &SigmaClipConfig::new()).unwrap();
        assert!((result.rejection_rate() - 0.1).abs() < 1e-12);
    }
}
