use approx::assert_abs_diff_eq;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use firn_sensor::{
    BaselineConfig, ReflectorConfig, SensorError, process_baseline, process_reflector,
};
use firn_series::TimeSeries;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 4, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

const BASELINE_LENGTH: f64 = 1500.0;

/// True SWE in mm w.e. at `t`.
fn swe_at(t: NaiveDateTime) -> f64 {
    100.0 + 2.0 * (t - t0()).num_minutes() as f64 / 1440.0
}

/// Ten days of 15-minute up-components with a 3 m mast raise on day 5 and
/// no data on day 7.
fn baseline_epochs(seed: u64) -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 3.0).unwrap();
    (0..10 * 96)
        .map(|i| t0() + Duration::minutes(15 * i))
        .filter(|t| (*t - t0()).num_days() != 7)
        .map(|t| {
            let raise = if (t - t0()).num_days() >= 5 { -3000.0 } else { 0.0 };
            (t, BASELINE_LENGTH + swe_at(t) + raise + noise.sample(&mut rng))
        })
        .collect()
}

#[test]
fn baseline_recovers_swe() {
    let raw = baseline_epochs(11);
    let config = BaselineConfig::new("test", BASELINE_LENGTH);
    let out = process_baseline(&raw, &raw, &config).unwrap();

    assert_eq!(out.events.len(), 1);
    assert_eq!(out.events[0].at, t0() + Duration::days(5));
    assert_abs_diff_eq!(out.events[0].magnitude, -3000.0, epsilon = 20.0);
    assert!(out.transients.is_empty());

    // One bucket per calendar day, the empty day kept as a gap.
    assert_eq!(out.daily.len(), 10);
    assert!(out.daily.buckets()[7].median.is_none());
    assert_eq!(out.noise.n_gaps, 1);

    for (d, b) in out.daily.buckets().iter().enumerate() {
        if let Some(m) = b.median {
            let expected = swe_at(t0() + Duration::days(d as i64) + Duration::hours(12));
            assert_abs_diff_eq!(m, expected, epsilon = 5.0);
        }
    }
    let mean_noise = out.noise.mean_noise.unwrap();
    assert!(mean_noise > 1.5 && mean_noise < 4.5, "{mean_noise}");
}

#[test]
fn baseline_shifts_timestamps() {
    let raw = baseline_epochs(3);
    let config = BaselineConfig::new("test", BASELINE_LENGTH);
    let out = process_baseline(&raw, &raw, &config).unwrap();
    assert_eq!(out.swe.first_time(), Some(t0() + Duration::seconds(18)));
    assert_eq!(out.epoch_counts.get(t0()), Some(96.0));
    assert_eq!(out.epoch_counts.get(t0() + Duration::days(7)), Some(0.0));
    assert_eq!(out.rolling.median.len(), out.swe.observed_len());
    assert!(out.swe.observed_len() + out.n_rejected == raw.len());
}

#[test]
fn baseline_counts_only_fixed_solutions() {
    // Every fourth epoch is fixed; the rest are float solutions that are
    // still processed.
    let raw = baseline_epochs(7);
    let fixed = raw.filter(|t, _| (t - t0()).num_minutes() % 60 == 0);
    let config = BaselineConfig::new("test", BASELINE_LENGTH);
    let out = process_baseline(&raw, &fixed, &config).unwrap();
    assert_eq!(out.epoch_counts.get(t0()), Some(24.0));
    assert_eq!(out.epoch_counts.get(t0() + Duration::days(1)), Some(24.0));
    assert!(out.swe.observed_len() > 24 * 9);
}

#[test]
fn baseline_counts_use_shifted_buckets() {
    let raw = baseline_epochs(9);
    // The shift moves the second epoch past midnight into day 1.
    let fixed: TimeSeries = vec![
        (t0() + Duration::hours(12), 0.0),
        (t0() + Duration::days(1) - Duration::seconds(10), 0.0),
        (t0() + Duration::days(1) + Duration::hours(6), 0.0),
    ]
    .into_iter()
    .collect();
    let config = BaselineConfig::new("test", BASELINE_LENGTH);
    let out = process_baseline(&raw, &fixed, &config).unwrap();
    assert_eq!(out.epoch_counts.get(t0()), Some(1.0));
    assert_eq!(out.epoch_counts.get(t0() + Duration::days(1)), Some(2.0));
}

#[test]
fn baseline_empty_input() {
    let empty = TimeSeries::new();
    let out = process_baseline(&empty, &empty, &BaselineConfig::new("empty", 0.0)).unwrap();
    assert!(out.daily.is_empty());
    assert!(out.time_of_min.is_none());
}

/// Six days of 5-minute reflector heights: 10 mm/day accumulation and a
/// 3 m mast raise on day 4.
fn reflector_epochs(seed: u64) -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 5.0).unwrap();
    (0..6 * 288)
        .map(|i| {
            let t = t0() + Duration::minutes(5 * i);
            let days = (t - t0()).num_minutes() as f64 / 1440.0;
            let raise = if days >= 4.0 { 3000.0 } else { 0.0 };
            (t, 2000.0 - 10.0 * days + raise + noise.sample(&mut rng))
        })
        .collect()
}

#[test]
fn reflector_accumulation() {
    let raw = reflector_epochs(5);
    let config = ReflectorConfig::new("ir").with_initial_accumulation(50.0);
    let out = process_reflector(&raw, &config).unwrap();

    assert_eq!(out.events.len(), 1);
    assert_abs_diff_eq!(out.events[0].magnitude, 3000.0, epsilon = 30.0);
    // A 15-minute interval only vanishes if all of its epochs were clipped.
    assert!(out.resampled.len() <= 6 * 96);
    assert!(out.resampled.len() > 6 * 96 - 20);
    assert_eq!(out.daily.len(), 6);
    for (d, b) in out.daily.buckets().iter().enumerate() {
        let m = b.median.unwrap();
        let expected = 50.0 + 10.0 * d as f64;
        assert_abs_diff_eq!(m, expected, epsilon = 5.0);
    }
}

#[test]
fn reflector_empty_input_is_an_error() {
    let err = process_reflector(&TimeSeries::new(), &ReflectorConfig::new("ir")).unwrap_err();
    match err {
        SensorError::Empty { series, stage } => {
            assert_eq!(series, "ir");
            assert_eq!(stage, "resampling");
        }
        other => panic!("expected Empty, got: {other}"),
    }
}
