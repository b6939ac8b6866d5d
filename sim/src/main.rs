//! swarm-sim: replays bounty-marketplace scenarios against in-memory engines.

mod config;
mod runner;
mod scenario;

use anyhow::Context;
use clap::Parser;
use config::SimConfig;
use runner::Simulation;
use scenario::Scenario;
use std::path::PathBuf;
use swarm_utils::{format_balances, LogFormat};

#[derive(Parser)]
#[command(name = "swarm-sim", about = "Bounty marketplace scenario simulator")]
struct Cli {
    /// Path to a TOML configuration file. Settings in the file are the base;
    /// flags and env vars override them.
    #[arg(long, env = "SWARM_SIM_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "SWARM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output: "human" or "json".
    #[arg(long, env = "SWARM_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Use the live-network market parameters instead of the configured ones.
    #[arg(long)]
    mainnet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a scenario, printing one JSON event per line.
    Run {
        /// Scenario file with a `[[steps]]` array.
        #[arg(long)]
        scenario: PathBuf,
    },
    /// Print the effective configuration as TOML.
    Params,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::from_toml_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if cli.mainnet {
        config.params = swarm_types::MarketParams::mainnet_defaults();
    }

    swarm_utils::init_tracing(&config.log_level, config.log_format);
    if let Some(path) = &cli.config {
        tracing::info!("loaded config from {}", path.display());
    }

    match cli.command {
        Command::Run { scenario } => {
            let script = Scenario::from_toml_file(&scenario)?;
            tracing::info!(
                steps = script.steps.len(),
                start = script.start_height,
                "replaying {}",
                scenario.display()
            );

            let mut sim = Simulation::new(&config)?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            let summary = sim.run(&script, &mut out).context("writing events")?;

            eprintln!("{}", format_balances(&sim.balances()));
            if summary.failed > 0 {
                tracing::warn!(failed = summary.failed, "some steps were rejected");
            }
        }
        Command::Params => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}
