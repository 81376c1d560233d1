use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Firn snow mass and height fusion engine.
#[derive(Parser)]
#[command(
    name = "firn",
    version,
    about = "Calibrated fusion of GNSS snow mass and height time series"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the full correction, fusion and calibration pipeline.
    Process(ProcessArgs),
    /// Evaluate the density error budget of a calibration curve.
    Budget(BudgetArgs),
}

/// Arguments for the `process` subcommand.
#[derive(clap::Args)]
pub struct ProcessArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "firn.toml")]
    pub config: PathBuf,

    /// Override output directory from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `budget` subcommand.
///
/// The calibration curve is `mass(h) = a·exp(b·h) + c` with mass in mm w.e.
/// and height in m.
#[derive(clap::Args)]
pub struct BudgetArgs {
    /// Curve amplitude `a` (mm w.e.).
    #[arg(short, long, allow_negative_numbers = true)]
    pub a: f64,

    /// Curve rate `b` (1/m).
    #[arg(short, long, allow_negative_numbers = true)]
    pub b: f64,

    /// Curve offset `c` (mm w.e.).
    #[arg(short, long, allow_negative_numbers = true)]
    pub c: f64,

    /// Mass uncertainties (mm w.e.), comma separated.
    #[arg(long = "mass-sigma", value_delimiter = ',', default_value = "10,30,50,90")]
    pub mass_sigma: Vec<f64>,

    /// Height uncertainties (m), comma separated. A single value is paired
    /// with every mass uncertainty.
    #[arg(long = "height-sigma", value_delimiter = ',', default_value = "0.1")]
    pub height_sigma: Vec<f64>,

    /// Path for the error profile Parquet file.
    #[arg(short, long, default_value = "error_budget.parquet")]
    pub output: PathBuf,
}
