use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use zonewatch_config::ZonewatchConfig;
use zonewatch_engine::{run_live, run_simulation, SimulationOptions};
use zonewatch_telemetry::EventLogger;

use crate::render::Dashboard;

#[derive(Parser)]
#[command(name = "zonewatch", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Monitor the configured camera until Ctrl-C
    Run(RunArgs),
    /// Run deterministic simulation (or replay if a scenario file is provided)
    Simulate(SimulateArgs),
    /// Print the effective configuration with secrets masked
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Configuration file; defaults to `config/zonewatch.yaml` plus environment
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Number of cycles to run
    #[arg(long, default_value_t = 25)]
    pub cycles: u64,
    /// Overrides the scenario and configured seeds
    #[arg(long)]
    pub seed: Option<u64>,
    /// Optional scenario file to replay instead of the seeded analyzer
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,
    #[arg(long)]
    pub validate_hash: Option<String>,
    /// Directory for bug reports written on a hash mismatch
    #[arg(long, default_value = ".")]
    pub report_dir: PathBuf,
    /// Print Prometheus metrics after the run
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => {
            let config = load_config(args.config.as_deref())?;
            EventLogger::init(&config.telemetry);
            run_live_mode(&config).await
        }
        Commands::Simulate(args) => {
            let config = load_config(args.config.as_deref())?;
            EventLogger::init(&config.telemetry);
            run_simulation_mode(&config, args).await
        }
        Commands::Config(args) => {
            let config = load_config(args.config.as_deref())?;
            print!("{}", serde_yaml::to_string(&config.redacted())?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ZonewatchConfig> {
    match path {
        Some(path) => ZonewatchConfig::load_from_path(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => ZonewatchConfig::load().context("loading configuration"),
    }
}

async fn run_live_mode(config: &ZonewatchConfig) -> anyhow::Result<()> {
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    let picture = run_live(config, shutdown, |picture| {
        println!("{}", Dashboard(picture));
    })
    .await?;

    info!("Monitoring stopped");
    println!("{}", Dashboard(&picture));
    Ok(())
}

async fn run_simulation_mode(config: &ZonewatchConfig, args: SimulateArgs) -> anyhow::Result<()> {
    let options = SimulationOptions {
        cycles: args.cycles,
        seed: args.seed,
        scenario: args.scenario,
        validate_hash: args.validate_hash,
        report_dir: args.report_dir,
    };

    let report = run_simulation(config, options).await?;

    println!("{}", Dashboard(&report.picture));
    if let Some(name) = &report.scenario {
        println!("Scenario: {name}");
    }
    println!("Seed: {}", report.seed);
    println!("Cycles: {}", report.cycles);
    println!("State hash: {}", report.state_hash);

    if args.metrics {
        print!("{}", report.metrics.gather_metrics()?);
    }
    Ok(())
}
