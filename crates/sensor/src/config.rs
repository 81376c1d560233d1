//! Configuration of the per-sensor chains.

use chrono::Duration;
use firn_aggregate::AggregateConfig;
use firn_jump::JumpConfig;
use firn_outlier::SigmaClipConfig;
use firn_series::Cadence;

use crate::error::SensorError;

/// Default jump threshold for baseline up-components (mm).
pub const BASELINE_JUMP_THRESHOLD: f64 = 1000.0;

/// Default jump threshold for reflector heights (mm).
pub const REFLECTOR_JUMP_THRESHOLD: f64 = 2500.0;

/// Default sigma multiplier of the outlier filter.
pub const DEFAULT_SIGMA: f64 = 2.0;

/// Configuration for [`process_baseline`](crate::process_baseline).
///
/// # Example
///
/// ```
/// use firn_sensor::BaselineConfig;
///
/// let config = BaselineConfig::new("upper-lower", 1520.0);
/// assert_eq!(config.time_shift().num_seconds(), 18);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BaselineConfig {
    name: String,
    baseline_length: f64,
    jump: JumpConfig,
    clip: SigmaClipConfig,
    time_shift: Duration,
    rolling_window: Duration,
    aggregate: AggregateConfig,
}

impl BaselineConfig {
    /// Creates a configuration for the series `name` with the surveyed
    /// baseline length in mm.
    ///
    /// Defaults: falling jumps above 1000 mm, 3-day sigma clip at 2σ, 18 s
    /// time shift, 1-day rolling statistics, daily aggregation.
    pub fn new(name: impl Into<String>, baseline_length: f64) -> Self {
        Self {
            name: name.into(),
            baseline_length,
            jump: JumpConfig::baseline(BASELINE_JUMP_THRESHOLD),
            clip: SigmaClipConfig::new().with_sigma(DEFAULT_SIGMA),
            time_shift: Duration::seconds(18),
            rolling_window: Duration::days(1),
            aggregate: AggregateConfig::daily(),
        }
    }

    /// Sets the discontinuity correction configuration.
    pub fn with_jump(mut self, jump: JumpConfig) -> Self {
        self.jump = jump;
        self
    }

    /// Sets the outlier filter configuration.
    pub fn with_clip(mut self, clip: SigmaClipConfig) -> Self {
        self.clip = clip;
        self
    }

    /// Sets the shift applied to every timestamp after filtering.
    pub fn with_time_shift(mut self, shift: Duration) -> Self {
        self.time_shift = shift;
        self
    }

    /// Sets the window of the rolling median and spread.
    pub fn with_rolling_window(mut self, window: Duration) -> Self {
        self.rolling_window = window;
        self
    }

    /// Sets the aggregation configuration.
    pub fn with_aggregate(mut self, aggregate: AggregateConfig) -> Self {
        self.aggregate = aggregate;
        self
    }

    /// Series name used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Surveyed baseline length in mm.
    pub fn baseline_length(&self) -> f64 {
        self.baseline_length
    }

    /// Discontinuity correction configuration.
    pub fn jump(&self) -> &JumpConfig {
        &self.jump
    }

    /// Outlier filter configuration.
    pub fn clip(&self) -> &SigmaClipConfig {
        &self.clip
    }

    /// Timestamp shift.
    pub fn time_shift(&self) -> Duration {
        self.time_shift
    }

    /// Rolling statistics window.
    pub fn rolling_window(&self) -> Duration {
        self.rolling_window
    }

    /// Aggregation configuration.
    pub fn aggregate(&self) -> &AggregateConfig {
        &self.aggregate
    }

    /// Validates this configuration and its stage configurations.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::InvalidConfig`] for an empty name or a
    /// non-finite baseline length, or the stage error of the first invalid
    /// stage configuration.
    pub fn validate(&self) -> Result<(), SensorError> {
        validate_name(&self.name)?;
        if !self.baseline_length.is_finite() {
            return Err(SensorError::InvalidConfig {
                reason: format!(
                    "baseline_length must be finite, got {}",
                    self.baseline_length
                ),
            });
        }
        validate_stages(&self.name, &self.jump, &self.clip, &self.aggregate)?;
        if self.rolling_window <= Duration::zero() {
            return Err(SensorError::InvalidConfig {
                reason: "rolling_window must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration for [`process_reflector`](crate::process_reflector).
#[derive(Debug, Clone)]
pub struct ReflectorConfig {
    name: String,
    initial_accumulation: f64,
    jump: JumpConfig,
    clip: SigmaClipConfig,
    resample: Cadence,
    aggregate: AggregateConfig,
}

impl ReflectorConfig {
    /// Creates a configuration for the series `name`.
    ///
    /// Defaults: rising jumps above 2500 mm, 3-day sigma clip at 2σ,
    /// 15-minute medians, zero initial accumulation, daily aggregation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial_accumulation: 0.0,
            jump: JumpConfig::reflector(REFLECTOR_JUMP_THRESHOLD),
            clip: SigmaClipConfig::new().with_sigma(DEFAULT_SIGMA),
            resample: Cadence::Minutes(15),
            aggregate: AggregateConfig::daily(),
        }
    }

    /// Sets the snow height above the antenna at the first observation (mm).
    pub fn with_initial_accumulation(mut self, mm: f64) -> Self {
        self.initial_accumulation = mm;
        self
    }

    /// Sets the discontinuity correction configuration.
    pub fn with_jump(mut self, jump: JumpConfig) -> Self {
        self.jump = jump;
        self
    }

    /// Sets the outlier filter configuration.
    pub fn with_clip(mut self, clip: SigmaClipConfig) -> Self {
        self.clip = clip;
        self
    }

    /// Sets the cadence of the intermediate medians.
    pub fn with_resample(mut self, cadence: Cadence) -> Self {
        self.resample = cadence;
        self
    }

    /// Sets the aggregation configuration.
    pub fn with_aggregate(mut self, aggregate: AggregateConfig) -> Self {
        self.aggregate = aggregate;
        self
    }

    /// Series name used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snow height above the antenna at the first observation (mm).
    pub fn initial_accumulation(&self) -> f64 {
        self.initial_accumulation
    }

    /// Discontinuity correction configuration.
    pub fn jump(&self) -> &JumpConfig {
        &self.jump
    }

    /// Outlier filter configuration.
    pub fn clip(&self) -> &SigmaClipConfig {
        &self.clip
    }

    /// Cadence of the intermediate medians.
    pub fn resample(&self) -> Cadence {
        self.resample
    }

    /// Aggregation configuration.
    pub fn aggregate(&self) -> &AggregateConfig {
        &self.aggregate
    }

    /// Validates this configuration and its stage configurations.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::InvalidConfig`] for an empty name or a
    /// non-finite initial accumulation, or the stage error of the first
    /// invalid stage configuration.
    pub fn validate(&self) -> Result<(), SensorError> {
        validate_name(&self.name)?;
        if !self.initial_accumulation.is_finite() {
            return Err(SensorError::InvalidConfig {
                reason: format!(
                    "initial_accumulation must be finite, got {}",
                    self.initial_accumulation
                ),
            });
        }
        validate_stages(&self.name, &self.jump, &self.clip, &self.aggregate)
    }
}

fn validate_name(name: &str) -> Result<(), SensorError> {
    if name.trim().is_empty() {
        return Err(SensorError::InvalidConfig {
            reason: "name must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_stages(
    name: &str,
    jump: &JumpConfig,
    clip: &SigmaClipConfig,
    aggregate: &AggregateConfig,
) -> Result<(), SensorError> {
    jump.validate().map_err(|source| SensorError::Jump {
        series: name.to_string(),
        source,
    })?;
    clip.validate().map_err(|source| SensorError::Outlier {
        series: name.to_string(),
        source,
    })?;
    aggregate.validate().map_err(|source| SensorError::Aggregate {
        series: name.to_string(),
        source,
    })
}
