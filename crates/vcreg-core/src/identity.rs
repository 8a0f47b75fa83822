//! # Identifier Newtypes
//!
//! Distinct types for the three identifier namespaces the registry deals
//! with. A `CredentialId` cannot be passed where a holder `Did` is expected,
//! and none of them can be constructed empty.
//!
//! `Did` only checks syntax (`did:<method>:<method-specific-id>`). Whether a
//! DID names a real account is the host's business; see the registry's
//! `IdentifierResolver`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Upper bound on the byte length of any identifier.
pub const MAX_ID_LEN: usize = 256;

fn check_opaque(kind: &'static str, value: &str) -> Result<(), CoreError> {
    let reject = |reason: &str| CoreError::InvalidIdentifier {
        kind,
        value: value.to_string(),
        reason: reason.to_string(),
    };
    if value.trim().is_empty() {
        return Err(reject("must not be empty"));
    }
    if value.len() > MAX_ID_LEN {
        return Err(reject(&format!("longer than {MAX_ID_LEN} bytes")));
    }
    if value.chars().any(char::is_control) {
        return Err(reject("contains control characters"));
    }
    Ok(())
}

/// A decentralized identifier naming an issuer, holder, or subject.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

impl Did {
    /// Parse and validate DID syntax.
    ///
    /// Accepts `did:<method>:<id>` where `method` is lowercase ASCII
    /// alphanumerics and `id` is non-empty and drawn from
    /// `[A-Za-z0-9._:%-]`.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        check_opaque("DID", s)?;
        let reject = |reason: &str| CoreError::InvalidIdentifier {
            kind: "DID",
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let rest = s.strip_prefix("did:").ok_or_else(|| reject("missing did: scheme"))?;
        let (method, specific) = rest
            .split_once(':')
            .ok_or_else(|| reject("missing method-specific identifier"))?;

        if method.is_empty()
            || !method
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(reject("method must be lowercase alphanumeric"));
        }
        if specific.is_empty() {
            return Err(reject("method-specific identifier is empty"));
        }
        if !specific
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '%' | '-'))
        {
            return Err(reject("method-specific identifier has invalid characters"));
        }
        Ok(Self(s.to_string()))
    }

    /// The DID method (`key`, `web`, ...).
    pub fn method(&self) -> &str {
        self.0[4..].split(':').next().unwrap_or_default()
    }

    /// Borrow as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Did {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.0
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap an identifier.
            pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
                let value = value.into();
                check_opaque($kind, &value)?;
                Ok(Self(value))
            }

            /// Borrow as `&str`.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(
    /// Identifier of a verifiable credential. Never reused, even after revocation.
    CredentialId,
    "credential id"
);

opaque_id!(
    /// Identifier of a verifiable presentation.
    PresentationId,
    "presentation id"
);
