//! # Replay CLI
//!
//! Imports a genesis document into a fresh in-memory store, then delivers
//! every transaction of every block in order, as the host runtime would.
//! A failed transaction is reported and its write-set discarded; replay
//! carries on with the next one.
//!
//! ```bash
//! vcreg replay --genesis genesis.json --blocks blocks.yaml --export final.json
//! ```
//!
//! Block file layout:
//!
//! ```yaml
//! - height: 1
//!   time: "2026-01-01T00:00:00Z"
//!   txs:
//!     - hash: "a1"
//!       msg:
//!         create_credential:
//!           id: cred_1
//!           issuer: did:x:issuer1
//!           type: [VerifiableCredential]
//!           credentialSubject: { id: did:x:alice }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Deserialize;

use vcreg_core::Timestamp;
use vcreg_registry::{
    export_genesis, import_genesis, BlockInfo, DidSyntaxResolver, ErrorKind, GenesisState, Keeper,
    Msg, MsgServer, TxResponse,
};
use vcreg_store::MemoryStore;

use crate::config::CliConfig;
use crate::document::{read_document, write_document};
use crate::genesis::load_genesis;

/// Replay subcommand arguments.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Genesis file to start from.
    #[arg(long)]
    pub genesis: PathBuf,

    /// Block file to apply.
    #[arg(long)]
    pub blocks: PathBuf,

    /// Write the final state here as a genesis document.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// One block of the replay input.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Block {
    /// Block height. Must increase strictly.
    pub height: u64,
    /// Block time. Must not decrease.
    pub time: Timestamp,
    /// Transactions, in delivery order.
    #[serde(default)]
    pub txs: Vec<Tx>,
}

/// One transaction carrying one message.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tx {
    /// Transaction hash.
    pub hash: String,
    /// The message.
    pub msg: Msg,
}

/// Outcome of one delivered transaction.
#[derive(Debug)]
pub struct TxOutcome {
    /// Block height.
    pub height: u64,
    /// Transaction hash.
    pub hash: String,
    /// Message name.
    pub msg: &'static str,
    /// Committed response, or the rejection kind and message.
    pub result: std::result::Result<TxResponse, (ErrorKind, String)>,
}

/// Final state and per-transaction outcomes of a replay.
#[derive(Debug)]
pub struct ReplayReport {
    /// Outcomes in delivery order.
    pub outcomes: Vec<TxOutcome>,
    /// Final registry state.
    pub final_state: GenesisState,
}

impl ReplayReport {
    /// Number of rejected transactions.
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

fn check_ordering(blocks: &[Block]) -> Result<()> {
    for pair in blocks.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.height <= prev.height {
            bail!(
                "block heights must increase: {} follows {}",
                next.height,
                prev.height
            );
        }
        if next.time < prev.time {
            bail!(
                "block time goes backwards at height {}: {} < {}",
                next.height,
                next.time,
                prev.time
            );
        }
    }
    Ok(())
}

/// Run `blocks` on top of `genesis`.
pub fn replay(genesis: &GenesisState, blocks: Vec<Block>, config: &CliConfig) -> Result<ReplayReport> {
    check_ordering(&blocks)?;

    let mut store = MemoryStore::new();
    import_genesis(&mut store, genesis).context("failed to import genesis")?;
    let bank = config.bank();
    config.seed_balances(&bank, &mut store)?;
    let server = MsgServer::new(Keeper::new(bank, DidSyntaxResolver));

    let mut outcomes = Vec::new();
    for block in blocks {
        for tx in block.txs {
            let info = BlockInfo {
                height: block.height,
                time: block.time,
                tx_hash: tx.hash.clone(),
            };
            let msg_name = tx.msg.name();
            let result = server
                .deliver(&mut store, &info, tx.msg)
                .map_err(|e| (e.kind(), e.to_string()));
            outcomes.push(TxOutcome {
                height: block.height,
                hash: tx.hash,
                msg: msg_name,
                result,
            });
        }
    }

    let final_state = export_genesis(&store).context("failed to export final state")?;
    Ok(ReplayReport {
        outcomes,
        final_state,
    })
}

/// Execute the replay subcommand.
pub fn run_replay(args: &ReplayArgs, config: &CliConfig) -> Result<u8> {
    let genesis = load_genesis(&args.genesis)?;
    let blocks: Vec<Block> = read_document(&args.blocks)?;
    let report = replay(&genesis, blocks, config)?;

    for outcome in &report.outcomes {
        print_outcome(outcome);
    }
    if let Some(path) = &args.export {
        write_document(path, &report.final_state)?;
        println!("exported final state to {}", path.display());
    }

    let failed = report.failed();
    println!(
        "{} transactions, {} committed, {} failed",
        report.outcomes.len(),
        report.outcomes.len() - failed,
        failed
    );
    Ok(if failed > 0 { 2 } else { 0 })
}

fn print_outcome(outcome: &TxOutcome) {
    match &outcome.result {
        Ok(resp) => {
            println!("[{}] {} {}: ok", outcome.height, outcome.hash, outcome.msg);
            for event in &resp.events {
                println!("    {event}");
            }
        }
        Err((kind, message)) => {
            println!(
                "[{}] {} {}: FAILED ({kind}) {message}",
                outcome.height, outcome.hash, outcome.msg
            );
        }
    }
}

/// Load the blocks file alone. Exposed for tooling that inspects inputs.
pub fn load_blocks(path: &Path) -> Result<Vec<Block>> {
    let blocks: Vec<Block> = read_document(path)?;
    check_ordering(&blocks)?;
    Ok(blocks)
}
