mod cli;
mod config;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::{debug, info};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    logging::setup_logging(cli.verbose, cli.quiet)?;
    info!("molq v{} starting", env!("CARGO_PKG_VERSION"));

    let config = config::resolve(cli)?;
    debug!(?config, "resolved configuration");

    let report = molq_vqe::run_pipeline(&config).context("ground-state calculation failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("Estimated Ground State Energy: {}", report.total_energy());
    if let Some(exact) = report.exact_energy {
        println!("Exact Ground State Energy: {}", exact);
    }
    Ok(())
}
