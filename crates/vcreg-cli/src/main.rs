//! # vcreg CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vcreg_cli::config::CliConfig;
use vcreg_cli::genesis::{run_genesis, GenesisArgs};
use vcreg_cli::query::{run_query, QueryArgs};
use vcreg_cli::replay::{run_replay, ReplayArgs};

/// Verifiable credential registry CLI.
///
/// Validates genesis documents, replays blocks of registry messages
/// against an in-memory store, and answers index queries.
#[derive(Parser, Debug)]
#[command(name = "vcreg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the YAML configuration file (fee pool, seeded balances).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Genesis document operations.
    Genesis(GenesisArgs),

    /// Apply a block file on top of a genesis document.
    Replay(ReplayArgs),

    /// Query credentials, presentations, and parameters.
    Query(QueryArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Genesis(args) => run_genesis(&args),
        Commands::Replay(args) => run_replay(&args, &config),
        Commands::Query(args) => run_query(&args),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
