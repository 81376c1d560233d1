use std::path::PathBuf;

use serde::Deserialize;

/// Top-level firn configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirnConfig {
    /// Output settings.
    #[serde(default)]
    pub output: OutputToml,

    /// GNSS baseline series, one entry per receiver pair.
    #[serde(default)]
    pub baseline: Vec<BaselineToml>,

    /// GNSS reflector height series.
    #[serde(default)]
    pub reflector: Option<ReflectorToml>,

    /// Density estimation settings.
    #[serde(default)]
    pub density: DensityToml,

    /// Calibration fit settings.
    #[serde(default)]
    pub fit: FitToml,

    /// Error budget scenarios.
    #[serde(default)]
    pub uncertainty: UncertaintyToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            compression: default_compression(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("firn_output")
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}

/// Column layout of a raw input file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnsToml {
    #[serde(default = "default_time_column")]
    pub time: String,
    #[serde(default = "default_value_column")]
    pub value: String,
    #[serde(default)]
    pub quality: Option<String>,
}

impl Default for ColumnsToml {
    fn default() -> Self {
        Self {
            time: default_time_column(),
            value: default_value_column(),
            quality: None,
        }
    }
}

fn default_time_column() -> String {
    "time".to_string()
}
fn default_value_column() -> String {
    "value".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaselineToml {
    pub name: String,
    pub input: PathBuf,
    /// Up-component of the baseline at zero SWE (mm).
    #[serde(default)]
    pub baseline_length: f64,
    #[serde(default)]
    pub columns: ColumnsToml,
    /// Quality codes kept when a quality column is configured (1 = fixed
    /// ambiguities).
    #[serde(default = "default_accepted_quality")]
    pub accepted_quality: Vec<i32>,
    #[serde(default = "default_value_scale")]
    pub value_scale: f64,
    #[serde(default = "default_baseline_jump_threshold")]
    pub jump_threshold: f64,
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_time_shift_seconds")]
    pub time_shift_seconds: i64,
    #[serde(default = "default_rolling_days")]
    pub rolling_days: u32,
    #[serde(default = "default_min_count")]
    pub min_count: usize,
}

fn default_accepted_quality() -> Vec<i32> {
    vec![1]
}
fn default_value_scale() -> f64 {
    1.0
}
fn default_baseline_jump_threshold() -> f64 {
    firn_sensor::BASELINE_JUMP_THRESHOLD
}
fn default_sigma() -> f64 {
    firn_sensor::DEFAULT_SIGMA
}
fn default_window_days() -> u32 {
    3
}
fn default_time_shift_seconds() -> i64 {
    18
}
fn default_rolling_days() -> u32 {
    1
}
fn default_min_count() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReflectorToml {
    #[serde(default = "default_reflector_name")]
    pub name: String,
    pub input: PathBuf,
    #[serde(default)]
    pub columns: ColumnsToml,
    #[serde(default = "default_value_scale")]
    pub value_scale: f64,
    /// Snow already on the ground at the first daily median (mm).
    #[serde(default)]
    pub initial_accumulation: f64,
    #[serde(default = "default_reflector_jump_threshold")]
    pub jump_threshold: f64,
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_resample_minutes")]
    pub resample_minutes: u32,
    #[serde(default = "default_min_count")]
    pub min_count: usize,
}

fn default_reflector_name() -> String {
    "reflector".to_string()
}
fn default_reflector_jump_threshold() -> f64 {
    firn_sensor::REFLECTOR_JUMP_THRESHOLD
}
fn default_resample_minutes() -> u32 {
    15
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DensityToml {
    /// Baseline supplying the mass series. Defaults to the first one.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default = "default_true")]
    pub interpolate_gaps: bool,
    /// Bulk density (kg/m³) converting reflector height to SWE for comparison.
    #[serde(default = "default_bulk_density")]
    pub bulk_density: f64,
    #[serde(default = "default_new_snow_interval")]
    pub new_snow_interval: usize,
    #[serde(default = "default_new_snow_min_gain")]
    pub new_snow_min_gain: f64,
}

impl Default for DensityToml {
    fn default() -> Self {
        Self {
            reference: None,
            interpolate_gaps: true,
            bulk_density: default_bulk_density(),
            new_snow_interval: default_new_snow_interval(),
            new_snow_min_gain: default_new_snow_min_gain(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_bulk_density() -> f64 {
    firn_density::DEFAULT_BULK_DENSITY
}
fn default_new_snow_interval() -> usize {
    6
}
fn default_new_snow_min_gain() -> f64 {
    0.03
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FitToml {
    #[serde(default = "default_true")]
    pub anchor: bool,
    #[serde(default = "default_anchor_sigma")]
    pub anchor_sigma: f64,
    #[serde(default = "default_rate_bounds")]
    pub rate_bounds: [f64; 2],
    #[serde(default = "default_max_iters")]
    pub max_iters: u64,
    /// Upper end of the sampled height domain (m).
    #[serde(default = "default_max_height")]
    pub max_height: f64,
}

impl Default for FitToml {
    fn default() -> Self {
        Self {
            anchor: true,
            anchor_sigma: default_anchor_sigma(),
            rate_bounds: default_rate_bounds(),
            max_iters: default_max_iters(),
            max_height: default_max_height(),
        }
    }
}

fn default_anchor_sigma() -> f64 {
    1e-6
}
fn default_rate_bounds() -> [f64; 2] {
    [-10.0, 10.0]
}
fn default_max_iters() -> u64 {
    1000
}
fn default_max_height() -> f64 {
    1.5
}

/// Error budget scenarios. Each sweep pairs its list with a single value of
/// the other quantity.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UncertaintyToml {
    #[serde(default = "default_mass_sigmas")]
    pub mass_sigmas: Vec<f64>,
    #[serde(default = "default_mass_sweep_height_sigma")]
    pub mass_sweep_height_sigma: f64,
    #[serde(default = "default_height_sigmas")]
    pub height_sigmas: Vec<f64>,
    #[serde(default = "default_height_sweep_mass_sigma")]
    pub height_sweep_mass_sigma: f64,
    #[serde(default = "default_fixed_mass_sigma")]
    pub fixed_mass_sigma: f64,
    #[serde(default = "default_fixed_height_sigma")]
    pub fixed_height_sigma: f64,
    #[serde(default = "default_fixed_densities")]
    pub fixed_densities: Vec<f64>,
}

impl Default for UncertaintyToml {
    fn default() -> Self {
        Self {
            mass_sigmas: default_mass_sigmas(),
            mass_sweep_height_sigma: default_mass_sweep_height_sigma(),
            height_sigmas: default_height_sigmas(),
            height_sweep_mass_sigma: default_height_sweep_mass_sigma(),
            fixed_mass_sigma: default_fixed_mass_sigma(),
            fixed_height_sigma: default_fixed_height_sigma(),
            fixed_densities: default_fixed_densities(),
        }
    }
}

fn default_mass_sigmas() -> Vec<f64> {
    vec![10.0, 30.0, 50.0, 90.0]
}
fn default_mass_sweep_height_sigma() -> f64 {
    0.1
}
fn default_height_sigmas() -> Vec<f64> {
    vec![0.1, 0.2, 0.3, 0.4]
}
fn default_height_sweep_mass_sigma() -> f64 {
    30.0
}
fn default_fixed_mass_sigma() -> f64 {
    30.0
}
fn default_fixed_height_sigma() -> f64 {
    0.25
}
fn default_fixed_densities() -> Vec<f64> {
    vec![50.0, 150.0, 300.0, 550.0]
}
