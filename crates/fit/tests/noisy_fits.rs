use approx::assert_abs_diff_eq;
use firn_fit::{
    ExponentialFitConfig, FitError, SampleGrid, fit_exponential, fit_noise_decay,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Daily (height m, SWE mm) pairs from a compacting snowpack.
fn snowpack(seed: u64, n: usize) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 8.0).unwrap();
    let mut pairs: Vec<(f64, f64)> = (0..n)
        .map(|_| {
            let h: f64 = rng.random_range(0.05..1.4);
            (h, 150.0 * ((1.1 * h).exp() - 1.0) + noise.sample(&mut rng))
        })
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    pairs
}

#[test]
fn recovers_rate_within_uncertainty() {
    let fit = fit_exponential(&snowpack(17, 120), &ExponentialFitConfig::new()).unwrap();
    let p = fit.exponential().unwrap();
    let se = fit.std_errors();

    assert!(se.iter().all(|s| s.is_finite() && *s > 0.0));
    assert!((p.b - 1.1).abs() < 4.0 * se[1], "b = {} ± {}", p.b, se[1]);
    assert!(fit.residual_rms() < 12.0);
}

#[test]
fn anchored_curve_passes_through_origin() {
    let fit = fit_exponential(&snowpack(3, 60), &ExponentialFitConfig::new()).unwrap();
    assert_abs_diff_eq!(fit.evaluate(0.0), 0.0, epsilon = 1e-3);
}

#[test]
fn fit_is_deterministic() {
    let pairs = snowpack(8, 40);
    let a = fit_exponential(&pairs, &ExponentialFitConfig::new()).unwrap();
    let b = fit_exponential(&pairs, &ExponentialFitConfig::new()).unwrap();
    assert_eq!(a.params(), b.params());
}

#[test]
fn empty_input_is_an_error_not_a_zero_model() {
    assert!(matches!(
        fit_exponential(&[], &ExponentialFitConfig::new()),
        Err(FitError::InsufficientData { n: 0, .. })
    ));
}

#[test]
fn noise_decay_from_noisy_counts() {
    let mut rng = StdRng::seed_from_u64(4);
    let pairs: Vec<(f64, f64)> = (0..200)
        .map(|_| {
            let n = rng.random_range(4..=96) as f64;
            let jitter = Normal::new(0.0, 1.0).unwrap().sample(&mut rng);
            (n, 30.0 / n.sqrt() + jitter)
        })
        .collect();
    let fit = fit_noise_decay(&pairs, &SampleGrid::count_default()).unwrap();
    let sigma0 = fit.params()[0];
    assert!((sigma0 - 30.0).abs() < 4.0 * fit.std_errors()[0] + 0.5);
}
