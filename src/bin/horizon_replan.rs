//! Run a receding-horizon replanning scenario from a JSON config
//!
//! Writes one obstacle snapshot and one trajectory per replanning cycle next
//! to the output path.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use horizon_core::{ReplanSession, RunOptions};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "horizon_replan")]
#[command(about = "Receding-horizon replanning with a config-selected model", long_about = None)]
#[command(version)]
struct Cli {
    /// Run configuration (JSON)
    #[arg(name = "CONFIG")]
    config: PathBuf,

    /// Model descriptor file, replaces the config's `model` key
    #[arg(short, long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Output path; files are written as <stem>_<i>.<ext> beside it
    #[arg(short, long, value_name = "FILE", default_value = "results/result.json")]
    output: PathBuf,

    /// Debug logging and per-expansion planner traces
    #[arg(short, long)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "trace"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn try_main(cli: Cli) -> Result<()> {
    let options = RunOptions {
        config: cli.config,
        model: cli.model,
        output: cli.output,
        verbose: cli.verbose,
    };

    let mut session = ReplanSession::prepare(&options)
        .with_context(|| format!("failed to prepare run from {}", options.config.display()))?;
    let trajectories = session.run()?;

    if let Some(last) = trajectories.last() {
        info!("last trajectory: {} samples, cost {:.3}", last.len(), last.cost);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
