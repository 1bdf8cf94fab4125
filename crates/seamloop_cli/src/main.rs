//! seamloop CLI
//!
//! Replay carousel scenarios headlessly and inspect the resulting index log.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod runner;
mod scenario;

use runner::Runner;
use scenario::Scenario;

#[derive(Parser)]
#[command(name = "seamloop")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Seamless loop carousel scenario runner", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario and print every index change
    Run {
        /// Scenario file
        scenario: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Pace frames against the wall clock
        #[arg(long)]
        realtime: bool,

        /// Carousel config file overriding the scenario's [carousel] table
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a scenario file and build its carousel
    Check {
        /// Scenario file
        scenario: PathBuf,

        /// Carousel config file overriding the scenario's [carousel] table
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            json,
            realtime,
            config,
        } => cmd_run(&scenario, json, realtime, config.as_deref()),

        Commands::Check { scenario, config } => cmd_check(&scenario, config.as_deref()),
    }
}

fn cmd_run(path: &Path, json: bool, realtime: bool, config: Option<&Path>) -> Result<()> {
    let scenario = Scenario::load(path)?;
    info!(
        "Running {} ({} steps, {} fps{})",
        path.display(),
        scenario.steps.len(),
        scenario.fps,
        if realtime { ", realtime" } else { "" }
    );

    let report = Runner::new(&scenario, realtime, config)?.run(&scenario.steps);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for event in &report.events {
            println!("{:>8.3}s  index {}", event.time, event.index);
        }
        println!(
            "final index {} at time {:.3}s after {} frames",
            report.final_index, report.final_time, report.frames
        );
    }

    Ok(())
}

fn cmd_check(path: &Path, config: Option<&Path>) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let runner = Runner::new(&scenario, false, config)?;
    let report = runner.finish();

    info!(
        "Scenario OK: {:?} binding, {} items, {} steps, starts at index {}",
        scenario.binding,
        scenario.items.count,
        scenario.steps.len(),
        report.final_index
    );
    Ok(())
}
