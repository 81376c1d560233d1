use chrono::{Duration, NaiveDate, NaiveDateTime};
use firn_aggregate::{AggregateConfig, NoiseSummary, aggregate};
use firn_series::TimeSeries;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 12, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[test]
fn n_days_give_n_buckets() {
    let mut rng = StdRng::seed_from_u64(1);
    for n_days in [1i64, 2, 17, 60] {
        // Irregular epochs: random offsets within each day.
        let series: TimeSeries = (0..n_days)
            .flat_map(|d| {
                let k = rng.random_range(1..40);
                (0..k)
                    .map(|_| {
                        let s = rng.random_range(0..86_400);
                        (t0() + Duration::days(d) + Duration::seconds(s), 1.0)
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        let agg = aggregate(&series, &AggregateConfig::daily()).unwrap();
        assert_eq!(agg.len() as i64, n_days);
    }
}

#[test]
fn mean_noise_recovers_sensor_sigma() {
    let mut rng = StdRng::seed_from_u64(21);
    let noise = Normal::new(0.0, 12.0).unwrap();
    let series: TimeSeries = (0..30 * 96)
        .map(|i| {
            (
                t0() + Duration::minutes(15 * i),
                500.0 + noise.sample(&mut rng),
            )
        })
        .collect();
    let agg = aggregate(&series, &AggregateConfig::daily()).unwrap();
    let summary = NoiseSummary::from_aggregated(&agg);

    assert_eq!(summary.n_buckets, 30);
    assert_eq!(summary.n_gaps, 0);
    let mean_noise = summary.mean_noise.unwrap();
    assert!((mean_noise - 12.0).abs() < 1.0, "mean noise {mean_noise}");
    let rel = summary.mean_relative_noise_pct.unwrap();
    assert!((rel - 2.4).abs() < 0.2, "relative noise {rel}");
}
