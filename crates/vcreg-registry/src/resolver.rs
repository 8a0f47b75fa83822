//! Account identifier resolution.
//!
//! The host decides which strings name real accounts. The registry only
//! asks, through [`IdentifierResolver`], and turns a refusal into a
//! validation error naming the offending field.

use std::collections::BTreeSet;

use vcreg_core::Did;

/// Validates that a string is a well-formed account reference.
pub trait IdentifierResolver {
    /// Resolve `account`, or explain why it is not an account.
    fn resolve(&self, account: &str) -> Result<Did, String>;
}

/// Accepts any syntactically valid DID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DidSyntaxResolver;

impl IdentifierResolver for DidSyntaxResolver {
    fn resolve(&self, account: &str) -> Result<Did, String> {
        Did::parse(account).map_err(|e| e.to_string())
    }
}

/// Accepts only DIDs from a fixed set of known accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownAccounts {
    accounts: BTreeSet<Did>,
}

impl KnownAccounts {
    /// Resolver over `accounts`.
    pub fn new(accounts: impl IntoIterator<Item = Did>) -> Self {
        Self {
            accounts: accounts.into_iter().collect(),
        }
    }
}

impl IdentifierResolver for KnownAccounts {
    fn resolve(&self, account: &str) -> Result<Did, String> {
        let did = DidSyntaxResolver.resolve(account)?;
        if self.accounts.contains(&did) {
            Ok(did)
        } else {
            Err("unknown account".to_string())
        }
    }
}
