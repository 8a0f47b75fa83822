//! # vcreg-cli — Operator CLI for the Credential Registry
//!
//! Drives the registry state machine from files, with no network or
//! consensus layer. State lives in memory for the duration of a command.
//!
//! ## Subcommands
//!
//! - `vcreg genesis validate` — Parse and validate a genesis document.
//! - `vcreg replay` — Apply a block file on top of a genesis document.
//! - `vcreg query` — Read-only lookups against a genesis or exported state.
//!
//! ```bash
//! vcreg genesis validate genesis.json
//! vcreg --config vcreg.yaml replay --genesis genesis.json --blocks blocks.yaml --export out.json
//! vcreg query --genesis out.json by-holder did:x:alice
//! ```
//!
//! Documents ending in `.yaml` or `.yml` are YAML; anything else is JSON.

pub mod config;
pub mod document;
pub mod genesis;
pub mod query;
pub mod replay;
