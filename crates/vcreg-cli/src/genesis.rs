//! # Genesis CLI
//!
//! ```bash
//! vcreg genesis validate genesis.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use vcreg_registry::GenesisState;

use crate::document::read_document;

/// Genesis subcommand arguments.
#[derive(Args, Debug)]
pub struct GenesisArgs {
    #[command(subcommand)]
    pub command: GenesisCommand,
}

/// Available genesis subcommands.
#[derive(Subcommand, Debug)]
pub enum GenesisCommand {
    /// Parse and validate a genesis document without applying it.
    Validate {
        /// Genesis file (JSON or YAML).
        file: PathBuf,
    },
}

/// Execute the genesis subcommand.
pub fn run_genesis(args: &GenesisArgs) -> Result<u8> {
    match &args.command {
        GenesisCommand::Validate { file } => run_validate(file),
    }
}

/// Load and validate a genesis document.
pub fn load_genesis(path: &Path) -> Result<GenesisState> {
    let genesis: GenesisState = read_document(path)?;
    genesis
        .validate()
        .with_context(|| format!("{} failed validation", path.display()))?;
    Ok(genesis)
}

fn run_validate(file: &Path) -> Result<u8> {
    let genesis = load_genesis(file)?;
    let revoked = genesis.credentials.iter().filter(|vc| vc.revoked).count();
    println!("{}: OK", file.display());
    println!(
        "  credentials:   {} ({} revoked)",
        genesis.credentials.len(),
        revoked
    );
    println!("  revocations:   {}", genesis.revocations.len());
    println!("  presentations: {}", genesis.presentations.len());
    println!(
        "  params:        max_credential_size={} credential_fee={} presentation_fee={}",
        genesis.params.max_credential_size,
        genesis.params.credential_fee,
        genesis.params.presentation_fee
    );
    Ok(0)
}
