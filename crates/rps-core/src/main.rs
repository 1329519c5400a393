//! Rock-Paper-Scissors Population Simulation
//!
//! Runs one world cycle by cycle, printing a summary of the population after
//! each cycle and a final summary when the cycle limit is reached or the
//! population dies out.
//!
//! Larger populations make cycles slower; staying under about a million
//! participants is recommended.

use clap::Parser;
use rps_core::{
    format_cycle_summary, format_final_summary, Config, IdSpace, RunError, Runner,
    SnapshotWriter, DEFAULT_CONFIG_PATH,
};
use rps_events::{CycleReport, CycleSnapshot};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "rps_sim")]
#[command(about = "Rock-Paper-Scissors population dynamics simulation")]
struct Args {
    /// Path to the TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Initial participants (rounded down to a multiple of 3)
    #[arg(long)]
    participants: Option<u64>,

    /// Maximum number of cycles to run
    #[arg(long)]
    cycles: Option<u64>,

    /// Initial counts per strategy as R,P,S
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    distribution: Option<Vec<i64>>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for snapshot files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Write a JSON snapshot after every cycle
    #[arg(long)]
    write_snapshots: bool,

    /// Suppress per-cycle summaries
    #[arg(long)]
    quiet: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    /// Layer command line overrides on top of the file configuration
    fn apply(&self, config: &mut Config) {
        if let Some(participants) = self.participants {
            config.simulation.participants = participants;
        }
        if let Some(cycles) = self.cycles {
            config.simulation.max_cycles = cycles;
        }
        if let Some(distribution) = &self.distribution {
            config.simulation.distribution = Some(distribution.clone());
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if self.write_snapshots {
            config.output.write_snapshots = true;
        }
    }
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default(&args.config)?;
    args.apply(&mut config);
    config.validate()?;

    if args.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    let mut runner = Runner::from_config(&config, Arc::new(IdSpace::new()))?;
    let mut writer = if config.output.write_snapshots {
        let writer = SnapshotWriter::new(&config.output.dir)?;
        info!("Writing snapshots to {}", writer.dir().display());
        Some(writer)
    } else {
        None
    };

    println!("Starting simulation...");
    println!();

    let quiet = args.quiet;
    let mut observer = |_: &CycleReport, snapshot: &CycleSnapshot| -> Result<(), RunError> {
        if !quiet {
            println!("{}", format_cycle_summary(snapshot));
        }
        if let Some(writer) = writer.as_mut() {
            writer.write(snapshot)?;
        }
        Ok(())
    };
    let summary = runner.run(&mut observer)?;

    println!();
    println!("{}", format_final_summary(&summary));

    if let Some(writer) = &writer {
        let path = writer.write_summary(&summary)?;
        info!(
            "Wrote {} snapshots and {}",
            writer.written(),
            path.display()
        );
    }

    Ok(())
}
