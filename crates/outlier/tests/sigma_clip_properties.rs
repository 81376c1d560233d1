use chrono::{Duration, NaiveDate, NaiveDateTime};
use firn_outlier::{SigmaClipConfig, sigma_clip};
use firn_series::TimeSeries;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// 20 days of quarter-hourly accumulation with a storm-driven trend and
/// sparse gross errors.
fn accumulating_series(seed: u64) -> (TimeSeries, Vec<NaiveDateTime>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 8.0).unwrap();
    let mut spikes = Vec::new();
    let series = (0..20 * 96)
        .map(|i| {
            let t = t0() + Duration::minutes(15 * i);
            let trend = if i > 10 * 96 { 6.0 * (i - 10 * 96) as f64 / 96.0 } else { 0.0 };
            let mut v = 250.0 + 40.0 * trend + noise.sample(&mut rng);
            if i > 96 && rng.random_bool(0.01) {
                v += 600.0;
                spikes.push(t);
            }
            (t, v)
        })
        .collect();
    (series, spikes)
}

#[test]
fn retained_is_unaltered_subset() {
    let (series, _) = accumulating_series(42);
    let result = sigma_clip(&series, &SigmaClipConfig::new()).unwrap();

    assert_eq!(
        result.retained.len() + result.rejected.len(),
        series.observed_len()
    );
    for (t, v) in result.retained.observed() {
        assert_eq!(series.get(t), Some(v));
    }
}

#[test]
fn gross_errors_are_rejected() {
    let (series, spikes) = accumulating_series(5);
    assert!(!spikes.is_empty());
    let result = sigma_clip(&series, &SigmaClipConfig::new().with_sigma(2.0)).unwrap();

    let rejected: Vec<NaiveDateTime> = result.rejected.iter().map(|(t, _)| *t).collect();
    let caught = spikes.iter().filter(|t| rejected.contains(t)).count();
    assert!(caught as f64 >= 0.9 * spikes.len() as f64);
}

#[test]
fn trend_is_not_clipped_as_outlier() {
    let (series, _) = accumulating_series(9);
    let result = sigma_clip(&series, &SigmaClipConfig::new()).unwrap();
    // The rising second half must survive largely intact.
    let late = result.retained.slice_from(t0() + Duration::days(15));
    assert!(late.len() as f64 > 0.9 * 5.0 * 96.0);
}
