use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use firn_density::{
    DensityConfig, DensitySource, NewSnowConfig, estimate_density, height_to_swe,
    new_snow_density, swe_to_height,
};
use firn_series::{AggregatedSeries, Bucket, Cadence, TimeSeries};

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 12, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn daily(values: impl IntoIterator<Item = Option<f64>>) -> AggregatedSeries {
    let buckets = values
        .into_iter()
        .enumerate()
        .map(|(i, median)| Bucket {
            start: start() + Duration::days(i as i64),
            median,
            std_dev: None,
            count: 24,
        })
        .collect();
    AggregatedSeries::new(Cadence::daily(), buckets).unwrap()
}

/// A snowpack settling from 0.5 m to 1.1 m at a constant 320 kg/m³.
fn snowpack() -> (AggregatedSeries, AggregatedSeries) {
    let heights: Vec<f64> = (0..30).map(|i| 0.5 + 0.02 * i as f64).collect();
    let height = daily(heights.iter().map(|h| Some(*h)));
    let mass = daily(heights.iter().map(|h| Some(h * 320.0)));
    (mass, height)
}

#[test]
fn constant_density_is_recovered() {
    let (mass, height) = snowpack();
    let result = estimate_density(&mass, &height, &DensityConfig::new()).unwrap();
    assert_eq!(result.density.observed_len(), 30);
    for v in result.density.observed_values() {
        assert_relative_eq!(v, 320.0, epsilon = 1e-9);
    }
}

#[test]
fn estimated_density_converts_back_to_mass() {
    let (mass, height) = snowpack();
    let density = estimate_density(&mass, &height, &DensityConfig::new())
        .unwrap()
        .density;
    let swe = height_to_swe(&height.medians(), DensitySource::Series(&density)).unwrap();
    for ((_, a), (_, b)) in swe.observed().zip(mass.medians().observed()) {
        assert_relative_eq!(a, b, epsilon = 1e-9);
    }
    let back = swe_to_height(&swe, DensitySource::Series(&density)).unwrap();
    assert_relative_eq!(back.values()[10].unwrap(), 0.7, epsilon = 1e-12);
}

#[test]
fn implausible_days_become_missing_without_aborting() {
    let (mass, height) = snowpack();
    let mut medians: Vec<Option<f64>> = height.buckets().iter().map(|b| b.median).collect();
    medians[3] = Some(0.0);
    medians[7] = Some(0.01);
    medians[12] = None;
    let height = daily(medians);

    let result = estimate_density(&mass, &height, &DensityConfig::new()).unwrap();
    assert_eq!(result.density.len(), 30);
    assert_eq!(result.density.observed_len(), 27);
    assert_eq!(result.n_undefined, 2);
    assert_eq!(result.n_implausible, 1);
}

#[test]
fn new_snow_over_a_storm() {
    // Six calm days, a 0.3 m storm at 100 kg/m³, then calm again.
    let height = daily((0..14).map(|i| Some(if i < 6 { 1.0 } else { 1.3 })));
    let mass = daily((0..14).map(|i| Some(if i < 6 { 300.0 } else { 330.0 })));
    let result = new_snow_density(&height, &mass, &NewSnowConfig::new()).unwrap();

    let storm = start() + Duration::days(6);
    assert_relative_eq!(result.density.get(storm).unwrap(), 100.0, epsilon = 1e-9);
    let calm = start() + Duration::days(10);
    assert_eq!(result.density.get(calm), None);
    assert!(result.height_gain.get(calm).is_none());
}

#[test]
fn constant_conversion_uses_bulk_density() {
    let swe: TimeSeries = vec![(start(), 408.0)].into_iter().collect();
    let bulk = DensitySource::Constant(firn_density::DEFAULT_BULK_DENSITY);
    let h = swe_to_height(&swe, bulk).unwrap();
    assert_relative_eq!(h.values()[0].unwrap(), 1.0, epsilon = 1e-12);
}
