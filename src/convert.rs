//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};
use chrono::Duration;

use crate::config::*;

use firn_aggregate::AggregateConfig;
use firn_density::{DensityConfig, NewSnowConfig};
use firn_fit::{ExponentialFitConfig, SampleGrid};
use firn_io::{Compression, ReaderConfig, WriterConfig};
use firn_jump::JumpConfig;
use firn_outlier::SigmaClipConfig;
use firn_sensor::{BaselineConfig, ReflectorConfig};
use firn_series::Cadence;
use firn_uncertainty::Uncertainty;

/// Height resolution of the sampled calibration curve (m).
const HEIGHT_STEP: f64 = 0.01;

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Builds a [`WriterConfig`] from the TOML output configuration.
pub fn build_writer_config(output: &OutputToml) -> Result<WriterConfig> {
    let compression = parse_compression(&output.compression)?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(output.row_group_size))
}

/// Builds a [`ReaderConfig`] from a column layout and value scale.
pub fn build_reader_config(columns: &ColumnsToml, value_scale: f64) -> Result<ReaderConfig> {
    let cfg = ReaderConfig::default()
        .with_time_column(&columns.time)
        .with_value_column(&columns.value)
        .with_quality_column(columns.quality.as_deref())
        .with_value_scale(value_scale);
    cfg.validate().context("invalid input column configuration")?;
    Ok(cfg)
}

fn sigma_clip_config(sigma: f64, window_days: u32) -> SigmaClipConfig {
    SigmaClipConfig::new()
        .with_sigma(sigma)
        .with_window(Duration::days(i64::from(window_days)))
}

/// Builds a [`BaselineConfig`] from one `[[baseline]]` table.
pub fn build_baseline_config(baseline: &BaselineToml) -> Result<BaselineConfig> {
    let cfg = BaselineConfig::new(&baseline.name, baseline.baseline_length)
        .with_jump(JumpConfig::baseline(baseline.jump_threshold))
        .with_clip(sigma_clip_config(baseline.sigma, baseline.window_days))
        .with_time_shift(Duration::seconds(baseline.time_shift_seconds))
        .with_rolling_window(Duration::days(i64::from(baseline.rolling_days)))
        .with_aggregate(AggregateConfig::daily().with_min_count(baseline.min_count));
    cfg.validate()
        .with_context(|| format!("invalid [[baseline]] {:?}", baseline.name))?;
    Ok(cfg)
}

/// Builds a [`ReflectorConfig`] from the `[reflector]` table.
pub fn build_reflector_config(reflector: &ReflectorToml) -> Result<ReflectorConfig> {
    let cadence = Cadence::minutes(reflector.resample_minutes)
        .context("invalid [reflector].resample_minutes")?;
    let cfg = ReflectorConfig::new(&reflector.name)
        .with_initial_accumulation(reflector.initial_accumulation)
        .with_jump(JumpConfig::reflector(reflector.jump_threshold))
        .with_clip(sigma_clip_config(reflector.sigma, reflector.window_days))
        .with_resample(cadence)
        .with_aggregate(AggregateConfig::daily().with_min_count(reflector.min_count));
    cfg.validate().context("invalid [reflector]")?;
    Ok(cfg)
}

/// Builds the [`DensityConfig`] and [`NewSnowConfig`] from the `[density]` table.
pub fn build_density_configs(density: &DensityToml) -> Result<(DensityConfig, NewSnowConfig)> {
    if !(density.bulk_density.is_finite() && density.bulk_density > 0.0) {
        bail!(
            "[density].bulk_density must be positive, got {}",
            density.bulk_density
        );
    }
    let new_snow = NewSnowConfig::new()
        .with_interval(density.new_snow_interval)
        .with_min_gain(density.new_snow_min_gain);
    new_snow.validate().context("invalid [density] new snow settings")?;
    Ok((
        DensityConfig::new().with_interpolate_gaps(density.interpolate_gaps),
        new_snow,
    ))
}

/// Builds an [`ExponentialFitConfig`] from the `[fit]` table.
///
/// The curve is sampled from 0 to `max_height` in 1 cm steps.
pub fn build_fit_config(fit: &FitToml) -> Result<ExponentialFitConfig> {
    if !(fit.max_height.is_finite() && fit.max_height >= HEIGHT_STEP) {
        bail!("[fit].max_height must be at least {HEIGHT_STEP} m, got {}", fit.max_height);
    }
    let n = (fit.max_height / HEIGHT_STEP).round() as usize + 1;
    let domain = SampleGrid::new(0.0, fit.max_height, n).context("invalid [fit] height domain")?;
    let cfg = ExponentialFitConfig::new()
        .with_anchor(fit.anchor)
        .with_anchor_sigma(fit.anchor_sigma)
        .with_rate_bounds(fit.rate_bounds[0], fit.rate_bounds[1])
        .with_max_iters(fit.max_iters)
        .with_domain(domain);
    cfg.validate().context("invalid [fit]")?;
    Ok(cfg)
}

/// Pairs mass and height uncertainties into scenarios.
///
/// Equal-length lists are paired element-wise; a single value on either side
/// is repeated for every entry of the other.
pub fn build_scenarios(mass: &[f64], height: &[f64]) -> Result<Vec<Uncertainty>> {
    let scenarios = match (mass.len(), height.len()) {
        (m, h) if m == h => Uncertainty::paired(mass, height),
        (_, 1) => Uncertainty::paired(mass, &vec![height[0]; mass.len()]),
        (1, _) => Uncertainty::paired(&vec![mass[0]; height.len()], height),
        (m, h) => bail!("cannot pair {m} mass uncertainties with {h} height uncertainties"),
    };
    scenarios.context("invalid uncertainty scenario")
}

/// The three error budgets of the `[uncertainty]` table.
#[derive(Debug)]
pub struct BudgetScenarios {
    /// Mass uncertainty sweep at a fixed height uncertainty.
    pub mass_sweep: Vec<Uncertainty>,
    /// Height uncertainty sweep at a fixed mass uncertainty.
    pub height_sweep: Vec<Uncertainty>,
    /// Single scenario evaluated at nominal densities.
    pub fixed: Uncertainty,
    /// Nominal densities (kg/m³).
    pub densities: Vec<f64>,
}

/// Builds the error budget scenarios from the `[uncertainty]` table.
pub fn build_budget_scenarios(unc: &UncertaintyToml) -> Result<BudgetScenarios> {
    let mass_sweep = build_scenarios(&unc.mass_sigmas, &[unc.mass_sweep_height_sigma])
        .context("invalid [uncertainty] mass sweep")?;
    let height_sweep = build_scenarios(&[unc.height_sweep_mass_sigma], &unc.height_sigmas)
        .context("invalid [uncertainty] height sweep")?;
    let fixed = Uncertainty::new(unc.fixed_mass_sigma, unc.fixed_height_sigma)
        .context("invalid [uncertainty] fixed-density scenario")?;
    Ok(BudgetScenarios {
        mass_sweep,
        height_sweep,
        fixed,
        densities: unc.fixed_densities.clone(),
    })
}
