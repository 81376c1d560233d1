//! Bucketing of raw observations.

use chrono::NaiveDateTime;
use firn_series::{AggregatedSeries, Bucket, Cadence, TimeSeries};
use tracing::debug;

use crate::config::AggregateConfig;
use crate::error::AggregateError;

/// Summarises `series` into contiguous buckets at the configured cadence.
///
/// Buckets span from the one containing the first timestamp to the one
/// containing the last. Each bucket holds the median and sample standard
/// deviation of its observed values. A bucket with fewer than `min_count`
/// observations has a missing median; one with fewer than two has a missing
/// standard deviation.
///
/// # Errors
///
/// Returns [`AggregateError::InvalidConfig`] for an invalid configuration.
#[tracing::instrument(skip(series, config), fields(n = series.len(), cadence = ?config.cadence()))]
pub fn aggregate(
    series: &TimeSeries,
    config: &AggregateConfig,
) -> Result<AggregatedSeries, AggregateError> {
    config.validate()?;

    let buckets: Vec<Bucket> = group(series, config.cadence())
        .into_iter()
        .map(|(start, mut values)| {
            let count = values.len();
            firn_stats::sort_floats(&mut values);
            let median = (count >= config.min_count())
                .then(|| firn_stats::median(&values));
            let std_dev = if count >= config.min_count() {
                firn_stats::sample_sd(&values)
            } else {
                None
            };
            Bucket {
                start,
                median,
                std_dev,
                count,
            }
        })
        .collect();

    let gaps = buckets.iter().filter(|b| b.median.is_none()).count();
    debug!(buckets = buckets.len(), gaps, "aggregation finished");

    Ok(AggregatedSeries::new(config.cadence(), buckets)?)
}

/// Number of observed values in every bucket spanned by `series`.
pub fn count_per_bucket(series: &TimeSeries, cadence: Cadence) -> TimeSeries {
    group(series, cadence)
        .into_iter()
        .map(|(start, values)| (start, values.len() as f64))
        .collect()
}

/// Splits the observed values of `series` into contiguous buckets.
fn group(series: &TimeSeries, cadence: Cadence) -> Vec<(NaiveDateTime, Vec<f64>)> {
    let (Some(first), Some(last)) = (series.first_time(), series.last_time()) else {
        return Vec::new();
    };
    let end = cadence.bucket_start(last);
    let step = cadence.step();

    let mut groups: Vec<(NaiveDateTime, Vec<f64>)> = Vec::new();
    let mut start = cadence.bucket_start(first);
    while start <= end {
        groups.push((start, Vec::new()));
        start += step;
    }

    let mut idx = 0;
    for (t, v) in series.observed() {
        let bucket = cadence.bucket_start(t);
        while groups[idx].0 < bucket {
            idx += 1;
        }
        groups[idx].1.push(v);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn daily_median_and_spread() {
        let s: TimeSeries = vec![
            (at(1, 1), 1.0),
            (at(1, 5), 3.0),
            (at(1, 9), 8.0),
            (at(2, 0), 4.0),
        ]
        .into_iter()
        .collect();
        let agg = aggregate(&s, &AggregateConfig::daily()).unwrap();

        assert_eq!(agg.len(), 2);
        let b = agg.buckets()[0];
        assert_eq!(b.start, at(1, 0));
        assert_eq!(b.median, Some(3.0));
        assert_relative_eq!(b.std_dev.unwrap(), firn_stats::sd(&[1.0, 3.0, 8.0]));
        assert_eq!(agg.buckets()[1].std_dev, None);
        assert_eq!(agg.buckets()[1].count, 1);
    }

    #[test]
    fn empty_days_are_emitted_as_gaps() {
        let s: TimeSeries = vec![(at(1, 12), 1.0), (at(4, 12), 2.0)].into_iter().collect();
        let agg = aggregate(&s, &AggregateConfig::daily()).unwrap();
        assert_eq!(agg.len(), 4);
        assert_eq!(agg.buckets()[1].median, None);
        assert_eq!(agg.buckets()[2].count, 0);
    }

    #[test]
    fn min_count_masks_sparse_buckets() {
        let s: TimeSeries = vec![(at(1, 1), 1.0), (at(2, 1), 2.0), (at(2, 2), 4.0)]
            .into_iter()
            .collect();
        let agg = aggregate(&s, &AggregateConfig::daily().with_min_count(2)).unwrap();
        assert_eq!(agg.buckets()[0].median, None);
        assert_eq!(agg.buckets()[1].median, Some(3.0));
    }

    #[test]
    fn quarter_hour_buckets() {
        let cadence = Cadence::minutes(15).unwrap();
        let s: TimeSeries = (0..8)
            .map(|i| (at(1, 0) + Duration::minutes(5 * i), i as f64))
            .collect();
        let agg = aggregate(&s, &AggregateConfig::new(cadence)).unwrap();
        assert_eq!(agg.medians().observed_values(), vec![1.0, 4.0, 6.5]);
    }

    #[test]
    fn empty_series_gives_empty_aggregate() {
        let agg = aggregate(&TimeSeries::new(), &AggregateConfig::daily()).unwrap();
        assert!(agg.is_empty());
    }

    #[test]
    fn counts_per_day() {
        let s: TimeSeries = vec![(at(1, 1), 1.0), (at(1, 2), 1.0), (at(3, 0), 1.0)]
            .into_iter()
            .collect();
        let counts = count_per_bucket(&s, Cadence::daily());
        assert_eq!(counts.observed_values(), vec![2.0, 0.0, 1.0]);
    }

    #[test]
    fn zero_min_count_is_rejected() {
        let config = AggregateConfig::daily().with_min_count(0);
        assert!(aggregate(&TimeSeries::new(), &config).is_err());
    }
}
