//! Ordered, explicitly-missing time series.

use chrono::{Duration, NaiveDateTime};

use crate::error::SeriesError;

/// An ordered sequence of `(timestamp, value)` observations.
///
/// Timestamps are strictly increasing. A value of `None` marks a missing
/// observation; non-finite inputs are stored as missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    times: Vec<NaiveDateTime>,
    values: Vec<Option<f64>>,
}

impl TimeSeries {
    /// Creates an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a series from unordered observations.
    ///
    /// Observations are sorted by timestamp. When a timestamp occurs more
    /// than once, the last supplied value wins.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDateTime, Option<f64>)>,
    {
        let mut obs: Vec<(NaiveDateTime, Option<f64>)> = observations
            .into_iter()
            .map(|(t, v)| (t, v.filter(|x| x.is_finite())))
            .collect();
        // Stable sort keeps input order within equal timestamps.
        obs.sort_by_key(|(t, _)| *t);

        let mut times: Vec<NaiveDateTime> = Vec::with_capacity(obs.len());
        let mut values: Vec<Option<f64>> = Vec::with_capacity(obs.len());
        for (t, v) in obs {
            if times.last() == Some(&t) {
                if let Some(last) = values.last_mut() {
                    *last = v;
                }
            } else {
                times.push(t);
                values.push(v);
            }
        }
        Self { times, values }
    }

    /// Builds a series from parallel timestamp and value vectors.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::LengthMismatch`] if the vectors differ in length.
    pub fn from_parts(times: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self, SeriesError> {
        if times.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        Ok(Self::from_observations(
            times.into_iter().zip(values.into_iter().map(Some)),
        ))
    }

    /// Number of entries, missing ones included.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the series has no entries.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of non-missing entries.
    pub fn observed_len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Timestamps in increasing order.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Values aligned with [`times`](Self::times).
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Iterates over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, Option<f64>)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Iterates over the non-missing entries.
    pub fn observed(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.iter().filter_map(|(t, v)| v.map(|x| (t, x)))
    }

    /// Non-missing values in time order.
    pub fn observed_values(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }

    /// Value at exactly `t`, if present and observed.
    pub fn get(&self, t: NaiveDateTime) -> Option<f64> {
        self.times
            .binary_search(&t)
            .ok()
            .and_then(|i| self.values[i])
    }

    /// First timestamp.
    pub fn first_time(&self) -> Option<NaiveDateTime> {
        self.times.first().copied()
    }

    /// Last timestamp.
    pub fn last_time(&self) -> Option<NaiveDateTime> {
        self.times.last().copied()
    }

    /// Smallest observed value and its timestamp (earliest on ties).
    pub fn min_observed(&self) -> Option<(NaiveDateTime, f64)> {
        self.observed()
            .fold(None, |best: Option<(NaiveDateTime, f64)>, (t, v)| match best {
                Some((_, b)) if b <= v => best,
                _ => Some((t, v)),
            })
    }

    /// Applies `f` to every observed value. Non-finite results become missing.
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            times: self.times.clone(),
            values: self
                .values
                .iter()
                .map(|v| v.map(&f).filter(|x| x.is_finite()))
                .collect(),
        }
    }

    /// Keeps the entries for which `keep(t, v)` is true.
    pub fn filter<F>(&self, keep: F) -> Self
    where
        F: Fn(NaiveDateTime, Option<f64>) -> bool,
    {
        let (times, values) = self.iter().filter(|&(t, v)| keep(t, v)).unzip();
        Self { times, values }
    }

    /// Drops missing entries.
    pub fn without_missing(&self) -> Self {
        self.filter(|_, v| v.is_some())
    }

    /// Moves every timestamp by `offset`.
    pub fn shift(&self, offset: Duration) -> Self {
        Self {
            times: self.times.iter().map(|t| *t + offset).collect(),
            values: self.values.clone(),
        }
    }

    /// Entries with timestamps at or after `start`.
    pub fn slice_from(&self, start: NaiveDateTime) -> Self {
        self.filter(|t, _| t >= start)
    }

    /// Fills interior missing values by linear interpolation in time.
    ///
    /// Leading and trailing missing values stay missing.
    pub fn interpolate_missing(&self) -> Self {
        let mut values = self.values.clone();
        let mut prev: Option<usize> = None;
        for i in 0..values.len() {
            if values[i].is_none() {
                continue;
            }
            if let Some(p) = prev {
                if i > p + 1 {
                    let (t0, v0) = (self.times[p], self.values[p].unwrap_or_default());
                    let (t1, v1) = (self.times[i], self.values[i].unwrap_or_default());
                    let span = (t1 - t0).num_milliseconds() as f64;
                    for (j, slot) in values.iter_mut().enumerate().take(i).skip(p + 1) {
                        let frac = (self.times[j] - t0).num_milliseconds() as f64 / span;
                        *slot = Some(v0 + frac * (v1 - v0));
                    }
                }
            }
            prev = Some(i);
        }
        Self {
            times: self.times.clone(),
            values,
        }
    }

    /// Value at `t`, linearly interpolated between the neighbouring observed
    /// values. `None` outside the observed span.
    pub fn interpolate_at(&self, t: NaiveDateTime) -> Option<f64> {
        let observed: Vec<(NaiveDateTime, f64)> = self.observed().collect();
        let idx = observed.partition_point(|(ti, _)| *ti < t);
        match (idx.checked_sub(1).map(|i| observed[i]), observed.get(idx)) {
            (_, Some(&(t1, v1))) if t1 == t => Some(v1),
            (Some((t0, v0)), Some(&(t1, v1))) => {
                let frac = (t - t0).num_milliseconds() as f64 / (t1 - t0).num_milliseconds() as f64;
                Some(v0 + frac * (v1 - v0))
            }
            _ => None,
        }
    }

    /// Pairs the observed values of two series on identical timestamps.
    pub fn inner_join(&self, other: &TimeSeries) -> Vec<(NaiveDateTime, f64, f64)> {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.times.len() && j < other.times.len() {
            match self.times[i].cmp(&other.times[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    if let (Some(a), Some(b)) = (self.values[i], other.values[j]) {
                        out.push((self.times[i], a, b));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        out
    }
}

impl FromIterator<(NaiveDateTime, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDateTime, f64)>>(iter: I) -> Self {
        Self::from_observations(iter.into_iter().map(|(t, v)| (t, Some(v))))
    }
}
