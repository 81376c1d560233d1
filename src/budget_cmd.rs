//! Budget command: density error budget of a given calibration curve.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use firn_fit::{ExponentialParams, SampleGrid};
use firn_io::{WriterConfig, write_error_profile};
use firn_uncertainty::propagate;

use crate::cli::BudgetArgs;
use crate::convert;

/// Heights (m) at which the relative errors are logged.
const SUMMARY_HEIGHTS: [f64; 3] = [0.5, 1.0, 2.0];

/// Evaluate the error budget and write it as Parquet.
pub fn run(args: BudgetArgs) -> Result<()> {
    let _cmd = info_span!("budget").entered();

    let params = ExponentialParams {
        a: args.a,
        b: args.b,
        c: args.c,
    };
    if ![params.a, params.b, params.c].iter().all(|v| v.is_finite()) {
        bail!(
            "curve parameters must be finite, got a={} b={} c={}",
            params.a,
            params.b,
            params.c
        );
    }
    let scenarios = convert::build_scenarios(&args.mass_sigma, &args.height_sigma)?;
    let grid = SampleGrid::height_extended();

    let profile = propagate(&params, &grid, &scenarios).context("error propagation failed")?;
    for &h in &SUMMARY_HEIGHTS {
        let i = ((h - grid.start()) / grid.step()).round() as usize;
        for (j, label) in profile.relative_labels().iter().enumerate() {
            info!(
                height = h,
                scenario = %label,
                relative = profile.relative()[[i, j]],
                absolute = profile.absolute()[[i, j]],
                "density error"
            );
        }
    }

    write_error_profile(&args.output, &profile, &WriterConfig::default())
        .with_context(|| format!("failed to write Parquet: {}", args.output.display()))?;
    info!(path = %args.output.display(), scenarios = scenarios.len(), "error budget written");
    Ok(())
}
