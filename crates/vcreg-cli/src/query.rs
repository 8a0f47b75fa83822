//! # Query CLI
//!
//! Loads a genesis document into an in-memory store and answers one
//! read-only query against it. Output is pretty-printed JSON.
//!
//! ```bash
//! vcreg query --genesis state.json by-issuer did:x:issuer1
//! vcreg query --genesis state.json credential urn:vcreg:credential:ab12...
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};

use vcreg_core::{CredentialId, PresentationId};
use vcreg_registry::{import_genesis, query};
use vcreg_store::{KvStore, MemoryStore};

use crate::genesis::load_genesis;

/// Query subcommand arguments.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Genesis (or exported state) file to query.
    #[arg(long)]
    pub genesis: PathBuf,

    #[command(subcommand)]
    pub command: QueryCommand,
}

/// Available queries.
#[derive(Subcommand, Debug, Clone)]
pub enum QueryCommand {
    /// A credential and, if revoked, its revocation record.
    Credential {
        /// Credential id.
        id: String,
    },
    /// Credentials issued by an account, in creation order.
    ByIssuer {
        /// Issuer DID.
        issuer: String,
    },
    /// Credentials held by a subject, in creation order.
    ByHolder {
        /// Subject DID.
        holder: String,
    },
    /// Credentials carrying a type tag, in creation order.
    ByType {
        /// Type tag, e.g. `UniversityDegree`.
        credential_type: String,
    },
    /// A presentation.
    Presentation {
        /// Presentation id.
        id: String,
    },
    /// Registry parameters and counters.
    Params,
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("failed to encode query result")
}

/// Answer `cmd` against `store`.
pub fn execute_query<S: KvStore + ?Sized>(store: &S, cmd: &QueryCommand) -> Result<Value> {
    match cmd {
        QueryCommand::Credential { id } => {
            let id = CredentialId::new(id.as_str())?;
            let vc = query::credential(store, &id)?;
            let revocation = if vc.revoked {
                Some(query::revocation(store, &id)?)
            } else {
                None
            };
            Ok(json!({
                "credential": to_value(&vc)?,
                "revocation": to_value(&revocation)?,
            }))
        }
        QueryCommand::ByIssuer { issuer } => to_value(&query::credentials_by_issuer(store, issuer)?),
        QueryCommand::ByHolder { holder } => to_value(&query::credentials_by_holder(store, holder)?),
        QueryCommand::ByType { credential_type } => {
            to_value(&query::credentials_by_type(store, credential_type)?)
        }
        QueryCommand::Presentation { id } => {
            let id = PresentationId::new(id.as_str())?;
            to_value(&query::presentation(store, &id)?)
        }
        QueryCommand::Params => Ok(json!({
            "params": to_value(&query::params(store)?)?,
            "credential_count": query::credential_count(store)?,
            "presentation_count": query::presentation_count(store)?,
        })),
    }
}

/// Execute the query subcommand.
pub fn run_query(args: &QueryArgs) -> Result<u8> {
    let genesis = load_genesis(&args.genesis)?;
    let mut store = MemoryStore::new();
    import_genesis(&mut store, &genesis).context("failed to import genesis")?;

    let result = execute_query(&store, &args.command)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(0)
}
