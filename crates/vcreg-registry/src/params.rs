//! # Module Parameters
//!
//! Set at genesis, read by every mutating operation. There is no message
//! that changes them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Default fee denomination.
pub const DEFAULT_DENOM: &str = "uvcr";

/// Default upper bound on a credential's canonical encoding, in bytes.
pub const DEFAULT_MAX_CREDENTIAL_SIZE: u64 = 64 * 1024;

/// An amount of a single denomination. Unsigned, so never negative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coin {
    /// Denomination.
    pub denom: String,
    /// Amount in the smallest unit.
    pub amount: u64,
}

impl Coin {
    /// A coin of `amount` units of `denom`.
    pub fn new(denom: impl Into<String>, amount: u64) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Registry parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Params {
    /// Upper bound, in bytes, on a credential's canonical encoding and on a
    /// presentation's holder payload.
    pub max_credential_size: u64,
    /// Charged to the issuer by `CreateCredential`.
    pub credential_fee: Coin,
    /// Charged to the holder by `CreatePresentation`.
    pub presentation_fee: Coin,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_credential_size: DEFAULT_MAX_CREDENTIAL_SIZE,
            credential_fee: Coin::new(DEFAULT_DENOM, 0),
            presentation_fee: Coin::new(DEFAULT_DENOM, 0),
        }
    }
}

impl Params {
    /// Range-check the parameters.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.max_credential_size == 0 {
            return Err(RegistryError::InvalidParams(
                "max_credential_size must be greater than zero".to_string(),
            ));
        }
        for (name, fee) in [
            ("credential_fee", &self.credential_fee),
            ("presentation_fee", &self.presentation_fee),
        ] {
            if fee.denom.trim().is_empty() {
                return Err(RegistryError::InvalidParams(format!("{name} denom is empty")));
            }
        }
        Ok(())
    }
}
