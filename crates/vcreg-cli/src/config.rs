//! CLI runtime configuration, loaded from the YAML file given by the
//! global `--config` flag.
//!
//! ```yaml
//! fee_denom: uvcr
//! fee_pool: vcreg/fee_pool
//! balances:
//!   did:x:issuer1: 1000
//!   did:x:alice: 50
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use vcreg_registry::params::DEFAULT_DENOM;
use vcreg_registry::{StoreBank, DEFAULT_FEE_POOL};
use vcreg_store::KvStore;

use crate::document::read_document;

/// Reference-bank setup used by replay and query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CliConfig {
    /// Denomination of the seeded balances.
    pub fee_denom: String,
    /// Account that collects fees.
    pub fee_pool: String,
    /// Initial balances, by account.
    pub balances: BTreeMap<String, u64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            fee_denom: DEFAULT_DENOM.to_string(),
            fee_pool: DEFAULT_FEE_POOL.to_string(),
            balances: BTreeMap::new(),
        }
    }
}

impl CliConfig {
    /// Load from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => read_document(p).context("failed to load configuration"),
            None => Ok(Self::default()),
        }
    }

    /// The reference bank described by this config.
    pub fn bank(&self) -> StoreBank {
        StoreBank::new(self.fee_pool.clone())
    }

    /// Write the configured balances into `store`.
    pub fn seed_balances<S: KvStore + ?Sized>(&self, bank: &StoreBank, store: &mut S) -> Result<()> {
        for (account, amount) in &self.balances {
            bank.set_balance(store, account, &self.fee_denom, *amount)
                .with_context(|| format!("failed to seed balance for {account}"))?;
        }
        tracing::debug!(accounts = self.balances.len(), denom = %self.fee_denom, "balances seeded");
        Ok(())
    }
}
