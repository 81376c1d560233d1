//! Per-bucket robust summaries at a fixed cadence.

use chrono::NaiveDateTime;

use crate::cadence::Cadence;
use crate::error::SeriesError;
use crate::series::TimeSeries;

/// Robust summary of the observations falling in one bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    /// Bucket start, aligned to the cadence.
    pub start: NaiveDateTime,
    /// Median of the bucket's observations, `None` for a gap.
    pub median: Option<f64>,
    /// Sample standard deviation, `None` when fewer than two observations.
    pub std_dev: Option<f64>,
    /// Number of observations in the bucket.
    pub count: usize,
}

/// A series of [`Bucket`]s at a fixed [`Cadence`].
///
/// Buckets are contiguous: every bucket between the first and the last is
/// present, gaps carry `median == None`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    cadence: Cadence,
    buckets: Vec<Bucket>,
}

impl AggregatedSeries {
    /// Builds an aggregated series from contiguous, aligned buckets.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::MisalignedBucket`] if a bucket start is not on a
    /// cadence boundary or buckets are not exactly one step apart.
    pub fn new(cadence: Cadence, buckets: Vec<Bucket>) -> Result<Self, SeriesError> {
        for (i, b) in buckets.iter().enumerate() {
            if !cadence.is_aligned(b.start) {
                return Err(SeriesError::MisalignedBucket {
                    start: b.start,
                    reason: "start is not on a cadence boundary".to_string(),
                });
            }
            if i > 0 && b.start - buckets[i - 1].start != cadence.step() {
                return Err(SeriesError::MisalignedBucket {
                    start: b.start,
                    reason: "buckets are not contiguous".to_string(),
                });
            }
        }
        Ok(Self { cadence, buckets })
    }

    /// An aggregated series without buckets.
    pub fn empty(cadence: Cadence) -> Self {
        Self {
            cadence,
            buckets: Vec::new(),
        }
    }

    /// Cadence of the buckets.
    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// All buckets in time order.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Bucket starting at `start`.
    pub fn get(&self, start: NaiveDateTime) -> Option<&Bucket> {
        self.buckets
            .binary_search_by_key(&start, |b| b.start)
            .ok()
            .map(|i| &self.buckets[i])
    }

    /// Medians as a time series indexed by bucket start.
    pub fn medians(&self) -> TimeSeries {
        TimeSeries::from_observations(self.buckets.iter().map(|b| (b.start, b.median)))
    }

    /// Standard deviations as a time series indexed by bucket start.
    pub fn std_devs(&self) -> TimeSeries {
        TimeSeries::from_observations(self.buckets.iter().map(|b| (b.start, b.std_dev)))
    }

    /// Observation counts as a time series indexed by bucket start.
    pub fn counts(&self) -> TimeSeries {
        TimeSeries::from_observations(
            self.buckets
                .iter()
                .map(|b| (b.start, Some(b.count as f64))),
        )
    }

    /// Copy with interior gaps in the medians filled linearly.
    ///
    /// Standard deviations and counts of filled buckets are left unchanged.
    pub fn with_interpolated_medians(&self) -> Self {
        let filled = self.medians().interpolate_missing();
        let buckets = self
            .buckets
            .iter()
            .zip(filled.values())
            .map(|(b, m)| Bucket { median: *m, ..*b })
            .collect();
        Self {
            cadence: self.cadence,
            buckets,
        }
    }

    /// Multiplies every median and standard deviation by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        let buckets = self
            .buckets
            .iter()
            .map(|b| Bucket {
                median: b.median.map(|m| m * factor),
                std_dev: b.std_dev.map(|s| s * factor.abs()),
                ..*b
            })
            .collect();
        Self {
            cadence: self.cadence,
            buckets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn bucket(start: NaiveDateTime, median: Option<f64>) -> Bucket {
        Bucket {
            start,
            median,
            std_dev: None,
            count: usize::from(median.is_some()),
        }
    }

    #[test]
    fn rejects_gapped_buckets() {
        let err = AggregatedSeries::new(
            Cadence::daily(),
            vec![bucket(day(1), Some(1.0)), bucket(day(3), Some(3.0))],
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::MisalignedBucket { .. }));
    }

    #[test]
    fn rejects_unaligned_start() {
        let err = AggregatedSeries::new(
            Cadence::daily(),
            vec![bucket(day(1) + Duration::hours(1), Some(1.0))],
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::MisalignedBucket { .. }));
    }

    #[test]
    fn interpolated_medians_fill_gap() {
        let agg = AggregatedSeries::new(
            Cadence::daily(),
            vec![
                bucket(day(1), Some(10.0)),
                bucket(day(2), None),
                bucket(day(3), Some(30.0)),
            ],
        )
        .unwrap();
        let filled = agg.with_interpolated_medians();
        assert_eq!(filled.get(day(2)).unwrap().median, Some(20.0));
        assert_eq!(filled.get(day(2)).unwrap().count, 0);
    }

    #[test]
    fn scale_converts_units() {
        let agg = AggregatedSeries::new(
            Cadence::daily(),
            vec![Bucket {
                start: day(1),
                median: Some(1500.0),
                std_dev: Some(20.0),
                count: 4,
            }],
        )
        .unwrap();
        let m = agg.scale(1e-3);
        assert_relative_eq!(m.buckets()[0].median.unwrap(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(m.buckets()[0].std_dev.unwrap(), 0.02, epsilon = 1e-12);
    }
}
