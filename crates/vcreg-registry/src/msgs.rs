//! Inbound messages. They arrive ordered and already authenticated; the
//! account fields (`issuer`, `revoker`, `holder`) are raw strings. The
//! keeper resolves `issuer` and `holder`; `revoker` is compared verbatim
//! against the credential's issuer and subject id.

use serde::{Deserialize, Serialize};

use vcreg_core::{CredentialId, PresentationId, Timestamp};

use crate::credential::CredentialSubject;
use crate::proof::{CredentialStatus, Proof};

/// Create a credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MsgCreateCredential {
    /// Caller-supplied id. Derived from the content when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CredentialId>,
    /// Issuer account; pays the creation fee.
    pub issuer: String,
    /// Type tags.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,
    /// Subject and claims.
    #[serde(rename = "credentialSubject")]
    pub subject: CredentialSubject,
    /// Optional proof.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
    /// Optional status descriptor.
    #[serde(rename = "credentialStatus", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CredentialStatus>,
    /// Optional expiration.
    #[serde(rename = "expirationDate", default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Timestamp>,
}

/// Revoke a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MsgRevokeCredential {
    /// Credential to revoke.
    pub credential_id: CredentialId,
    /// Revoking account.
    pub revoker: String,
    /// Free text.
    #[serde(default)]
    pub reason: String,
}

/// Compose a presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MsgCreatePresentation {
    /// Caller-supplied id. Derived from the content when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PresentationId>,
    /// Holder account; pays the presentation fee.
    pub holder: String,
    /// Type tags. Empty means `VerifiablePresentation`.
    #[serde(rename = "type", default)]
    pub presentation_type: Vec<String>,
    /// Referenced credentials.
    #[serde(rename = "verifiableCredential")]
    pub credential_ids: Vec<CredentialId>,
    /// Optional proof.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

/// Any registry message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Msg {
    /// See [`MsgCreateCredential`].
    CreateCredential(MsgCreateCredential),
    /// See [`MsgRevokeCredential`].
    RevokeCredential(MsgRevokeCredential),
    /// See [`MsgCreatePresentation`].
    CreatePresentation(MsgCreatePresentation),
}

impl Msg {
    /// Message name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateCredential(_) => "create_credential",
            Self::RevokeCredential(_) => "revoke_credential",
            Self::CreatePresentation(_) => "create_presentation",
        }
    }
}

impl From<MsgCreateCredential> for Msg {
    fn from(msg: MsgCreateCredential) -> Self {
        Self::CreateCredential(msg)
    }
}

impl From<MsgRevokeCredential> for Msg {
    fn from(msg: MsgRevokeCredential) -> Self {
        Self::RevokeCredential(msg)
    }
}

impl From<MsgCreatePresentation> for Msg {
    fn from(msg: MsgCreatePresentation) -> Self {
        Self::CreatePresentation(msg)
    }
}
