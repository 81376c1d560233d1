//! JSON run report: corrections, noise figures and fitted curves.

use chrono::NaiveDateTime;
use serde::Serialize;

use firn_aggregate::NoiseSummary;
use firn_density::{DensityResult, NewSnowDensity};
use firn_fit::FitResult;
use firn_jump::{DiscontinuityEvent, TransientOutlier};
use firn_sensor::{BaselineOutput, ReflectorOutput};

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn format_time(t: NaiveDateTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

/// Top-level report written next to the Parquet outputs.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub baselines: Vec<SeriesReport<'a>>,
    pub reflector: Option<SeriesReport<'a>>,
    pub density: Option<DensityReport>,
    pub calibration: Option<&'a FitResult>,
}

#[derive(Debug, Serialize)]
pub struct EventReport {
    pub at: String,
    pub magnitude: f64,
    pub iteration: usize,
}

impl From<&DiscontinuityEvent> for EventReport {
    fn from(e: &DiscontinuityEvent) -> Self {
        Self {
            at: format_time(e.at),
            magnitude: e.magnitude,
            iteration: e.iteration,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransientReport {
    pub at: String,
    pub value: f64,
}

impl From<&TransientOutlier> for TransientReport {
    fn from(t: &TransientOutlier) -> Self {
        Self {
            at: format_time(t.at),
            value: t.value,
        }
    }
}

/// Per-sensor summary.
#[derive(Debug, Serialize)]
pub struct SeriesReport<'a> {
    pub name: &'a str,
    pub n_epochs: usize,
    pub events: Vec<EventReport>,
    pub transients: Vec<TransientReport>,
    pub n_rejected: usize,
    pub noise: NoiseSummary,
    /// Baselines only: `noise(n) = σ₀ / sqrt(n)` over daily solution counts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_decay: Option<&'a FitResult>,
    /// Baselines only: time of the smallest SWE value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_at: Option<String>,
}

impl<'a> SeriesReport<'a> {
    pub fn baseline(
        name: &'a str,
        n_epochs: usize,
        output: &BaselineOutput,
        noise_decay: Option<&'a FitResult>,
    ) -> Self {
        Self {
            name,
            n_epochs,
            events: output.events.iter().map(EventReport::from).collect(),
            transients: output.transients.iter().map(TransientReport::from).collect(),
            n_rejected: output.n_rejected,
            noise: output.noise,
            noise_decay,
            minimum_at: output.time_of_min.map(format_time),
        }
    }

    pub fn reflector(name: &'a str, n_epochs: usize, output: &ReflectorOutput) -> Self {
        Self {
            name,
            n_epochs,
            events: output.events.iter().map(EventReport::from).collect(),
            transients: output.transients.iter().map(TransientReport::from).collect(),
            n_rejected: output.n_rejected,
            noise: output.noise,
            noise_decay: None,
            minimum_at: None,
        }
    }
}

/// Density estimation summary.
#[derive(Debug, Serialize)]
pub struct DensityReport {
    pub reference: String,
    pub n_valid: usize,
    pub n_undefined: usize,
    pub n_implausible: usize,
    pub mean_density: Option<f64>,
    pub mean_new_snow_density: Option<f64>,
}

impl DensityReport {
    pub fn new(reference: &str, density: &DensityResult, new_snow: &NewSnowDensity) -> Self {
        Self {
            reference: reference.to_string(),
            n_valid: density.density.observed_len(),
            n_undefined: density.n_undefined,
            n_implausible: density.n_implausible,
            mean_density: firn_stats::finite_mean(&density.density.observed_values()),
            mean_new_snow_density: firn_stats::finite_mean(&new_snow.density.observed_values()),
        }
    }
}
