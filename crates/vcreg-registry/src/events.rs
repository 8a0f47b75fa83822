//! Events emitted by committed messages, for external observers.
//!
//! Each event renders as a type string plus ordered key/value attributes.
//! Events of a rejected message are discarded with its write-set.

use std::fmt;

use serde::Serialize;

use vcreg_core::{CredentialId, Did, PresentationId};

/// A registry event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A credential was written.
    CredentialCreated {
        /// New credential id.
        id: CredentialId,
        /// Its issuer.
        issuer: Did,
        /// Its subject id.
        subject: String,
    },
    /// A credential was revoked.
    CredentialRevoked {
        /// Revoked credential id.
        id: CredentialId,
        /// Who revoked it.
        revoker: String,
    },
    /// A presentation was written.
    PresentationCreated {
        /// New presentation id.
        id: PresentationId,
        /// Its holder.
        holder: Did,
    },
}

impl Event {
    /// The event type string.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CredentialCreated { .. } => "credential_created",
            Self::CredentialRevoked { .. } => "credential_revoked",
            Self::PresentationCreated { .. } => "presentation_created",
        }
    }

    /// Attributes in a fixed order.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::CredentialCreated { id, issuer, subject } => vec![
                ("id", id.to_string()),
                ("issuer", issuer.to_string()),
                ("subject", subject.clone()),
            ],
            Self::CredentialRevoked { id, revoker } => {
                vec![("id", id.to_string()), ("revoker", revoker.clone())]
            }
            Self::PresentationCreated { id, holder } => {
                vec![("id", id.to_string()), ("holder", holder.to_string())]
            }
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())?;
        for (key, value) in self.attributes() {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}
