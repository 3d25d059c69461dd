use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use ttnetgen::{config, orchestrator};

/// Generator of time-triggered network topologies and traffic for offline schedulers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the sweep configuration YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory for the generated experiment records
    #[arg(short, long, default_value = "experiments")]
    output: PathBuf,

    /// Seed for deterministic generation; omit for entropy seeding
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting ttnetgen sweep");
    info!("Configuration file: {:?}", args.config);
    info!("Output directory: {:?}", args.output);

    let config = config::load_config(&args.config)?;
    let stats = orchestrator::run_sweep(&config, &args.output, args.seed)?;

    info!(
        "Done: {} experiment record(s) written to {:?} ({} skipped)",
        stats.generated, args.output, stats.skipped
    );
    Ok(())
}
