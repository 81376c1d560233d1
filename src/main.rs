mod budget_cmd;
mod cli;
mod config;
mod convert;
mod logging;
mod process_cmd;
mod report;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Process(args) => process_cmd::run(args),
        Command::Budget(args) => budget_cmd::run(args),
    }
}
