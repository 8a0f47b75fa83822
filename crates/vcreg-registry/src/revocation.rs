//! # Revocation
//!
//! A revocation record is written exactly once per credential and never
//! changed afterwards. Who may revoke is decided by
//! [`authorize_revocation()`], a pure capability check with a tagged
//! result, so the rule can be tested without a store.

use serde::{Deserialize, Serialize};

use vcreg_core::{CredentialId, Timestamp};

use crate::credential::VerifiableCredential;

/// Permanent record of a revocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RevocationRecord {
    /// Revoked credential.
    pub credential_id: CredentialId,
    /// Revoking party, as submitted: the issuer DID or the subject id.
    pub revoker: String,
    /// Free text supplied by the revoker.
    pub reason: String,
    /// Block time of the revocation.
    pub revoked_at: Timestamp,
    /// Block height of the revocation.
    pub block_height: u64,
}

/// The capacity in which a revoker acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokerRole {
    /// The credential's issuer.
    Issuer,
    /// The credential's subject, revoking their own credential.
    Subject,
}

impl RevokerRole {
    /// Lowercase name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issuer => "issuer",
            Self::Subject => "subject",
        }
    }
}

/// Outcome of the revocation capability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevocationAuthority {
    /// The revoker may revoke, in the given role.
    Authorized(RevokerRole),
    /// The revoker may not revoke.
    Unauthorized {
        /// Why not.
        reason: String,
    },
}

/// Decide whether `revoker` may revoke `credential`. The comparison is on
/// the raw identifier, since subject ids need not be DIDs. Issuer takes
/// precedence when issuer and subject coincide.
pub fn authorize_revocation(credential: &VerifiableCredential, revoker: &str) -> RevocationAuthority {
    if credential.issuer.as_str() == revoker {
        RevocationAuthority::Authorized(RevokerRole::Issuer)
    } else if credential.credential_subject.id == revoker {
        RevocationAuthority::Authorized(RevokerRole::Subject)
    } else {
        RevocationAuthority::Unauthorized {
            reason: format!(
                "revoker is neither issuer {} nor subject {}",
                credential.issuer, credential.credential_subject.id
            ),
        }
    }
}
