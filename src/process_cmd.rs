//! Process command: correct every sensor series, fuse mass and height,
//! calibrate and write the error budgets.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use tracing::{info, info_span, warn};

use firn_compare::{Comparison, compare_series, to_json};
use firn_density::{DensitySource, estimate_density, height_to_swe, new_snow_density};
use firn_fit::{FitResult, SampleGrid, fit_exponential, fit_noise_decay, pair_by_time};
use firn_io::{
    IoError, ReaderConfig, WriterConfig, read_epochs, write_aggregated, write_error_profile,
    write_series,
};
use firn_sensor::{
    BaselineConfig, BaselineOutput, ReflectorConfig, ReflectorOutput, process_baseline,
    process_reflector,
};
use firn_series::{AggregatedSeries, TimeSeries};
use firn_uncertainty::{propagate, propagate_fixed_densities};

use crate::cli::ProcessArgs;
use crate::config::{BaselineToml, FirnConfig, ReflectorToml};
use crate::convert::{self, BudgetScenarios};
use crate::report::{DensityReport, Report, SeriesReport};

/// Reflector heights are processed in mm; density needs metres.
const MM_TO_M: f64 = 1e-3;

/// A processed baseline and its noise-decay curve.
struct BaselineRun {
    name: String,
    n_epochs: usize,
    output: BaselineOutput,
    noise_decay: Option<FitResult>,
}

/// A processed reflector series.
struct ReflectorRun {
    name: String,
    n_epochs: usize,
    output: ReflectorOutput,
}

/// Run the full processing pipeline.
pub fn run(args: ProcessArgs) -> Result<()> {
    let _cmd = info_span!("process").entered();

    // 1. Load project TOML and build every stage configuration up front
    let toml_str = fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: FirnConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;
    if config.baseline.is_empty() && config.reflector.is_none() {
        bail!("nothing to process: configure at least one [[baseline]] or a [reflector]");
    }
    check_unique_names(&config)?;

    let writer_cfg = convert::build_writer_config(&config.output)?;
    let baseline_cfgs = config
        .baseline
        .iter()
        .map(|b| {
            Ok((
                b,
                convert::build_baseline_config(b)?,
                convert::build_reader_config(&b.columns, b.value_scale)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    let reflector_cfg = config
        .reflector
        .as_ref()
        .map(|r| -> Result<_> {
            Ok((
                r,
                convert::build_reflector_config(r)?,
                convert::build_reader_config(&r.columns, r.value_scale)?,
            ))
        })
        .transpose()?;
    let (density_cfg, new_snow_cfg) = convert::build_density_configs(&config.density)?;
    let fit_cfg = convert::build_fit_config(&config.fit)?;
    let budgets = convert::build_budget_scenarios(&config.uncertainty)?;

    let out_dir = args.output.unwrap_or_else(|| config.output.dir.clone());
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;

    // 2. Baselines are independent: process them in parallel
    let baselines: Vec<BaselineRun> = baseline_cfgs
        .par_iter()
        .map(|(toml, cfg, reader)| run_baseline(toml, cfg, reader))
        .collect::<Result<_>>()?;
    for b in &baselines {
        write_baseline(&out_dir, b, &writer_cfg)?;
    }

    // 3. Reflector
    let reflector = reflector_cfg
        .map(|(toml, cfg, reader)| run_reflector(toml, &cfg, &reader))
        .transpose()?;
    if let Some(r) = &reflector {
        write_reflector(&out_dir, r, &writer_cfg)?;
    }

    // 4. Cross-sensor comparisons
    let reference = reference_baseline(&baselines, config.density.reference.as_deref())?;
    let mut comparisons: Vec<Comparison> = Vec::new();
    if let Some(reference) = reference {
        for other in baselines.iter().filter(|b| b.name != reference.name) {
            let label = format!("{} - {}", other.name, reference.name);
            push_comparison(
                &mut comparisons,
                &label,
                &reference.output.daily.medians(),
                &other.output.daily.medians(),
            );
        }
    }

    // 5. Fusion: density, calibration curve and error budgets
    let mut density_report = None;
    let mut calibration = None;
    if let (Some(reference), Some(refl)) = (reference, &reflector) {
        let _fuse = info_span!("fuse", mass = %reference.name, height = %refl.name).entered();
        let mass = &reference.output.daily;
        let height = refl.output.daily.scale(MM_TO_M);

        let density = estimate_density(mass, &height, &density_cfg)
            .context("density estimation failed")?;
        let new_snow = new_snow_density(&height, mass, &new_snow_cfg)
            .context("new-snow density estimation failed")?;
        write_output(&out_dir, "density.parquet", |p| {
            write_series(p, &density.density, &writer_cfg)
        })?;
        write_output(&out_dir, "new_snow_density.parquet", |p| {
            write_series(p, &new_snow.density, &writer_cfg)
        })?;
        info!(
            valid = density.density.observed_len(),
            undefined = density.n_undefined,
            implausible = density.n_implausible,
            "density estimated"
        );
        density_report = Some(DensityReport::new(&reference.name, &density, &new_snow));

        let bulk = DensitySource::Constant(config.density.bulk_density);
        let reflector_swe = height_to_swe(&height.medians(), bulk)
            .context("reflector SWE conversion failed")?;
        push_comparison(
            &mut comparisons,
            &format!("{} - {}", refl.name, reference.name),
            &mass.medians(),
            &reflector_swe,
        );

        let pairs = pair_by_time(&height.medians(), &mass.medians());
        match fit_exponential(&pairs, &fit_cfg) {
            Ok(fit) => {
                write_budgets(&out_dir, &fit, &budgets, &writer_cfg)?;
                calibration = Some(fit);
            }
            Err(e) => warn!(error = %e, n = pairs.len(), "calibration curve not fitted"),
        }
    } else if reflector.is_some() {
        info!("no baseline configured; skipping density and calibration");
    }

    // 6. Reports
    let report = Report {
        baselines: baselines
            .iter()
            .map(|b| {
                SeriesReport::baseline(&b.name, b.n_epochs, &b.output, b.noise_decay.as_ref())
            })
            .collect(),
        reflector: reflector
            .as_ref()
            .map(|r| SeriesReport::reflector(&r.name, r.n_epochs, &r.output)),
        density: density_report,
        calibration: calibration.as_ref(),
    };
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    write_text(&out_dir.join("report.json"), &json)?;

    let json = to_json(&comparisons).context("failed to serialize comparisons")?;
    write_text(&out_dir.join("comparisons.json"), &json)?;

    info!(dir = %out_dir.display(), "processing complete");
    Ok(())
}

/// Output files are keyed by series name, so names must not collide.
fn check_unique_names(config: &FirnConfig) -> Result<()> {
    let mut seen = HashSet::new();
    let names = config
        .baseline
        .iter()
        .map(|b| b.name.as_str())
        .chain(config.reflector.as_ref().map(|r| r.name.as_str()));
    for name in names {
        if !seen.insert(name) {
            bail!("duplicate series name: {name:?}");
        }
    }
    Ok(())
}

fn reference_baseline<'a>(
    baselines: &'a [BaselineRun],
    name: Option<&str>,
) -> Result<Option<&'a BaselineRun>> {
    match name {
        None => Ok(baselines.first()),
        Some(name) => match baselines.iter().find(|b| b.name == name) {
            Some(b) => Ok(Some(b)),
            None => bail!("[density].reference {name:?} is not a configured baseline"),
        },
    }
}

fn run_baseline(
    toml: &BaselineToml,
    cfg: &BaselineConfig,
    reader: &ReaderConfig,
) -> Result<BaselineRun> {
    let _span = info_span!("baseline", name = %toml.name).entered();
    info!(path = %toml.input.display(), "reading epochs");
    let epochs = read_epochs(&toml.input, reader)
        .with_context(|| format!("failed to read epochs: {}", toml.input.display()))?;
    let raw = epochs.select_quality(&toml.accepted_quality);
    let fixed = epochs.fixed_solutions();
    info!(
        n_epochs = epochs.len(),
        n_selected = raw.observed_len(),
        n_fixed = fixed.observed_len(),
        "epochs selected"
    );

    let output = process_baseline(&raw, &fixed, cfg)
        .with_context(|| format!("baseline {:?} failed", toml.name))?;

    let pairs = pair_by_time(&output.epoch_counts, &output.daily.std_devs());
    let noise_decay = match fit_noise_decay(&pairs, &SampleGrid::count_default()) {
        Ok(fit) => Some(fit),
        Err(e) => {
            warn!(error = %e, "noise decay not fitted");
            None
        }
    };

    Ok(BaselineRun {
        name: toml.name.clone(),
        n_epochs: epochs.len(),
        output,
        noise_decay,
    })
}

fn run_reflector(
    toml: &ReflectorToml,
    cfg: &ReflectorConfig,
    reader: &ReaderConfig,
) -> Result<ReflectorRun> {
    let _span = info_span!("reflector", name = %toml.name).entered();
    info!(path = %toml.input.display(), "reading epochs");
    let epochs = read_epochs(&toml.input, reader)
        .with_context(|| format!("failed to read epochs: {}", toml.input.display()))?;
    let n_epochs = epochs.len();
    let output = process_reflector(&epochs.into_series(), cfg)
        .with_context(|| format!("reflector {:?} failed", toml.name))?;
    Ok(ReflectorRun {
        name: toml.name.clone(),
        n_epochs,
        output,
    })
}

fn write_baseline(dir: &Path, run: &BaselineRun, cfg: &WriterConfig) -> Result<()> {
    let name = &run.name;
    write_output(dir, &format!("{name}_corrected.parquet"), |p| {
        write_series(p, &run.output.corrected, cfg)
    })?;
    write_output(dir, &format!("{name}_swe.parquet"), |p| {
        write_series(p, &run.output.swe, cfg)
    })?;
    write_output(dir, &format!("{name}_rolling_median.parquet"), |p| {
        write_series(p, &run.output.rolling.median, cfg)
    })?;
    write_daily(dir, name, &run.output.daily, cfg)
}

fn write_reflector(dir: &Path, run: &ReflectorRun, cfg: &WriterConfig) -> Result<()> {
    let name = &run.name;
    write_output(dir, &format!("{name}_corrected.parquet"), |p| {
        write_series(p, &run.output.corrected, cfg)
    })?;
    write_output(dir, &format!("{name}_accumulation.parquet"), |p| {
        write_series(p, &run.output.accumulation, cfg)
    })?;
    write_daily(dir, name, &run.output.daily, cfg)
}

fn write_daily(dir: &Path, name: &str, daily: &AggregatedSeries, cfg: &WriterConfig) -> Result<()> {
    write_output(dir, &format!("{name}_daily.parquet"), |p| {
        write_aggregated(p, daily, cfg)
    })
}

fn write_budgets(
    dir: &Path,
    fit: &FitResult,
    budgets: &BudgetScenarios,
    cfg: &WriterConfig,
) -> Result<()> {
    let Some(params) = fit.exponential() else {
        bail!("calibration fit did not produce an exponential curve");
    };
    let grid = SampleGrid::height_extended();

    let mass = propagate(&params, &grid, &budgets.mass_sweep).context("mass error budget")?;
    write_output(dir, "error_budget_mass.parquet", |p| {
        write_error_profile(p, &mass, cfg)
    })?;
    let height = propagate(&params, &grid, &budgets.height_sweep).context("height error budget")?;
    write_output(dir, "error_budget_height.parquet", |p| {
        write_error_profile(p, &height, cfg)
    })?;
    let fixed = propagate_fixed_densities(&params, &grid, budgets.fixed, &budgets.densities)
        .context("fixed-density error budget")?;
    write_output(dir, "error_budget_density.parquet", |p| {
        write_error_profile(p, &fixed, cfg)
    })?;
    info!(a = params.a, b = params.b, c = params.c, "error budgets written");
    Ok(())
}

fn push_comparison(
    out: &mut Vec<Comparison>,
    label: &str,
    reference: &TimeSeries,
    data: &TimeSeries,
) {
    match compare_series(label, reference, data) {
        Ok(c) => out.push(c),
        Err(e) => warn!(label, error = %e, "comparison skipped"),
    }
}

fn write_output<F>(dir: &Path, file: &str, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<(), IoError>,
{
    let path = dir.join(file);
    write(&path).with_context(|| format!("failed to write Parquet: {}", path.display()))?;
    info!(path = %path.display(), "written");
    Ok(())
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "written");
    Ok(())
}
