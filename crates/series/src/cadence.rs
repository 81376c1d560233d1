//! Fixed aggregation cadences aligned to midnight.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

use crate::error::SeriesError;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Width of the fixed buckets a series is aggregated into.
///
/// Bucket boundaries are aligned to midnight, so a 15-minute cadence yields
/// buckets starting at `00:00`, `00:15`, ... of every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// One bucket per calendar day.
    Daily,
    /// Sub-daily buckets of the given width in minutes.
    Minutes(u32),
}

impl Cadence {
    /// Daily cadence.
    pub fn daily() -> Self {
        Self::Daily
    }

    /// Sub-daily cadence of `minutes` width.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidCadence`] if `minutes` is zero or does
    /// not divide 1440.
    pub fn minutes(minutes: u32) -> Result<Self, SeriesError> {
        if minutes == 0 || MINUTES_PER_DAY % minutes != 0 {
            return Err(SeriesError::InvalidCadence { minutes });
        }
        if minutes == MINUTES_PER_DAY {
            return Ok(Self::Daily);
        }
        Ok(Self::Minutes(minutes))
    }

    /// Bucket width.
    pub fn step(&self) -> Duration {
        match self {
            Self::Daily => Duration::days(1),
            Self::Minutes(m) => Duration::minutes(i64::from(*m)),
        }
    }

    /// Start of the bucket containing `t`.
    pub fn bucket_start(&self, t: NaiveDateTime) -> NaiveDateTime {
        let midnight = t.date().and_time(NaiveTime::MIN);
        match self {
            Self::Daily => midnight,
            Self::Minutes(m) => {
                let minute_of_day = t.hour() * 60 + t.minute();
                let floored = minute_of_day - minute_of_day % m;
                midnight + Duration::minutes(i64::from(floored))
            }
        }
    }

    /// Whether `t` lies exactly on a bucket boundary.
    pub fn is_aligned(&self, t: NaiveDateTime) -> bool {
        self.bucket_start(t) == t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 12, 3)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn daily_floor_is_midnight() {
        assert_eq!(Cadence::daily().bucket_start(at(23, 59, 59)), at(0, 0, 0));
    }

    #[test]
    fn quarter_hour_floor() {
        let c = Cadence::minutes(15).unwrap();
        assert_eq!(c.bucket_start(at(10, 44, 59)), at(10, 30, 0));
        assert_eq!(c.bucket_start(at(10, 45, 0)), at(10, 45, 0));
    }

    #[test]
    fn rejects_non_dividing_width() {
        assert!(matches!(
            Cadence::minutes(7),
            Err(SeriesError::InvalidCadence { minutes: 7 })
        ));
        assert!(Cadence::minutes(0).is_err());
    }

    #[test]
    fn full_day_minutes_is_daily() {
        assert_eq!(Cadence::minutes(1440).unwrap(), Cadence::Daily);
    }

    #[test]
    fn alignment() {
        let c = Cadence::minutes(30).unwrap();
        assert!(c.is_aligned(at(6, 30, 0)));
        assert!(!c.is_aligned(at(6, 30, 1)));
    }
}
