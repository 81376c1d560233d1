//! Rolling median and standard deviation series.

use chrono::Duration;
use firn_series::TimeSeries;

use crate::config::validate_window;
use crate::error::OutlierError;
use crate::window::TrailingWindow;

/// Rolling summaries evaluated at every observed timestamp.
#[derive(Debug, Clone)]
pub struct RollingStats {
    /// Median of the trailing window.
    pub median: TimeSeries,
    /// Sample standard deviation of the trailing window; missing when the
    /// window holds fewer than two observations.
    pub std_dev: TimeSeries,
}

/// Computes the rolling median and spread over a trailing window `(t - W, t]`.
///
/// # Errors
///
/// Returns [`OutlierError::InvalidConfig`] if `window` is not positive.
pub fn rolling_stats(series: &TimeSeries, window: Duration) -> Result<RollingStats, OutlierError> {
    validate_window(window)?;

    let mut w = TrailingWindow::new(window);
    let mut median = Vec::with_capacity(series.len());
    let mut std_dev = Vec::with_capacity(series.len());
    for (t, v) in series.observed() {
        w.push(t, v);
        median.push((t, w.median()));
        std_dev.push((t, (w.len() >= 2).then(|| w.std_dev())));
    }

    Ok(RollingStats {
        median: TimeSeries::from_observations(median),
        std_dev: TimeSeries::from_observations(std_dev),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    #[test]
    fn daily_window_smooths() {
        let t0 = NaiveDate::from_ymd_opt(2022, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let s: TimeSeries = [1.0, 9.0, 2.0, 3.0]
            .iter()
            .enumerate()
            .map(|(i, v)| (t0 + Duration::hours(6 * i as i64), *v))
            .collect();
        let stats = rolling_stats(&s, Duration::days(1)).unwrap();

        assert_eq!(stats.median.observed_values(), vec![1.0, 5.0, 2.0, 2.5]);
        assert_eq!(stats.std_dev.values()[0], None);
        assert_relative_eq!(
            stats.std_dev.values()[3].unwrap(),
            firn_stats::sd(&[1.0, 9.0, 2.0, 3.0]),
            epsilon = 1e-12
        );
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(rolling_stats(&TimeSeries::new(), Duration::zero()).is_err());
    }
}
