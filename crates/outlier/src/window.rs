//! Trailing calendar-time window over a sorted buffer.

use std::collections::VecDeque;

use chrono::{Duration, NaiveDateTime};

/// Observations in the half-open interval `(t - width, t]` for the most
/// recently pushed `t`.
///
/// Keeps a time-ordered queue for eviction and a sorted copy of the values
/// for the median.
pub(crate) struct TrailingWindow {
    width: Duration,
    entries: VecDeque<(NaiveDateTime, f64)>,
    sorted: Vec<f64>,
}

impl TrailingWindow {
    pub(crate) fn new(width: Duration) -> Self {
        Self {
            width,
            entries: VecDeque::new(),
            sorted: Vec::new(),
        }
    }

    /// Adds an observation and evicts everything at or before `t - width`.
    ///
    /// Timestamps must be pushed in increasing order.
    pub(crate) fn push(&mut self, t: NaiveDateTime, v: f64) {
        self.entries.push_back((t, v));
        let pos = self.sorted.partition_point(|&x| x < v);
        self.sorted.insert(pos, v);

        let cutoff = t - self.width;
        while let Some(&(front_t, front_v)) = self.entries.front() {
            if front_t > cutoff {
                break;
            }
            self.entries.pop_front();
            let pos = self.sorted.partition_point(|&x| x < front_v);
            self.sorted.remove(pos);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Median of the window, `None` if empty.
    pub(crate) fn median(&self) -> Option<f64> {
        (!self.sorted.is_empty()).then(|| firn_stats::median(&self.sorted))
    }

    /// Sample standard deviation; zero for fewer than two observations.
    pub(crate) fn std_dev(&self) -> f64 {
        firn_stats::sd(&self.sorted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn hour(h: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::hours(h)
    }

    #[test]
    fn evicts_left_edge_exclusive() {
        let mut w = TrailingWindow::new(Duration::hours(2));
        w.push(hour(0), 1.0);
        w.push(hour(1), 2.0);
        w.push(hour(2), 3.0);
        // (0h, 2h] excludes the observation at 0h.
        assert_eq!(w.len(), 2);
        assert_relative_eq!(w.median().unwrap(), 2.5);
    }

    #[test]
    fn std_dev_matches_direct_computation() {
        let mut w = TrailingWindow::new(Duration::hours(100));
        let values = [3001.2, 2999.8, 3003.5, 2997.1, 3000.0];
        for (i, v) in values.iter().enumerate() {
            w.push(hour(i as i64), *v);
        }
        assert_relative_eq!(w.std_dev(), firn_stats::sd(&values), epsilon = 1e-9);
    }

    #[test]
    fn single_point_has_zero_spread() {
        let mut w = TrailingWindow::new(Duration::hours(1));
        w.push(hour(0), 7.0);
        assert_eq!(w.std_dev(), 0.0);
        assert_eq!(w.median(), Some(7.0));
    }

    #[test]
    fn constant_window_has_exactly_zero_spread() {
        let mut w = TrailingWindow::new(Duration::hours(10));
        for i in 0..5 {
            w.push(hour(i), 1234.5);
        }
        assert_eq!(w.std_dev(), 0.0);
    }
}
