//! Stakesim CLI
//!
//! Runs the four-node reference network headlessly.
//!
//! # Example
//!
//! ```bash
//! # Two honest epochs
//! stakesim --seed 42
//!
//! # Node 4 forges its reveal, print the final state as JSON
//! RUST_LOG=info stakesim -e 3 --adversary forged-reveal --json
//! ```

use clap::{Parser, ValueEnum};
use stakesim_node::Adversary;
use stakesim_simulator::{ScenarioConfig, Simulator};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AdversaryArg {
    ForgedReveal,
    RogueProposer,
    Silent,
}

impl From<AdversaryArg> for Adversary {
    fn from(arg: AdversaryArg) -> Self {
        match arg {
            AdversaryArg::ForgedReveal => Adversary::ForgedReveal,
            AdversaryArg::RogueProposer => Adversary::RogueProposer,
            AdversaryArg::Silent => Adversary::Silent,
        }
    }
}

/// Stakesim
///
/// Deterministic proof-of-stake network simulation.
#[derive(Parser, Debug)]
#[command(name = "stakesim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Random seed for node keys and committed values
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Number of validator-selection epochs to run
    #[arg(short = 'e', long, default_value = "2")]
    epochs: u32,

    /// Misbehavior of node 4
    #[arg(short = 'a', long, value_enum)]
    adversary: Option<AdversaryArg>,

    /// Seconds between epochs
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(1..))]
    epoch_interval: u64,

    /// Message delay in seconds
    #[arg(long, default_value = "1")]
    message_delay: u64,

    /// Print the final network snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,stakesim_simulator=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = ScenarioConfig::new(args.epochs)
        .with_seed(args.seed)
        .with_epoch_interval(Duration::from_secs(args.epoch_interval))
        .with_message_delay(Duration::from_secs(args.message_delay));
    if let Some(adversary) = args.adversary {
        config = config.with_adversary(adversary.into());
    }

    info!(
        seed = config.seed,
        epochs = config.epochs,
        adversary = ?config.adversary,
        "Starting simulation"
    );

    let report = match Simulator::new(config).run() {
        Ok(report) => report,
        Err(err) => {
            error!(%err, "simulation aborted");
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match report.snapshot.to_json() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                error!(%err, "could not encode snapshot");
                return ExitCode::FAILURE;
            }
        }
    } else {
        report.print_summary();
    }
    ExitCode::SUCCESS
}
