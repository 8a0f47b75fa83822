//! # Proof and Status Descriptors
//!
//! The registry stores proofs and forwards them; it never verifies them.
//! A proof may carry a signature or an opaque zero-knowledge blob in
//! `proof_value`. Only the envelope is checked: type and verification
//! method must be present, and no unknown fields are accepted.

use serde::{Deserialize, Serialize};

use vcreg_core::Timestamp;

/// A cryptographic proof attached to a credential or presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Proof {
    /// Proof suite name, e.g. `Ed25519Signature2020`.
    #[serde(rename = "type")]
    pub proof_type: String,

    /// When the proof was produced.
    pub created: Timestamp,

    /// DID URL of the key or circuit that produced the proof.
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,

    /// Proof purpose, e.g. `assertionMethod`.
    #[serde(rename = "proofPurpose", default, skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<String>,

    /// Encoded proof bytes. Opaque to the registry.
    #[serde(rename = "proofValue")]
    pub proof_value: String,
}

impl Proof {
    /// Check the envelope fields. Returns a description of the first
    /// problem found.
    pub fn check_envelope(&self) -> Result<(), String> {
        if self.proof_type.trim().is_empty() {
            return Err("proof type is empty".to_string());
        }
        if self.verification_method.trim().is_empty() {
            return Err("proof verificationMethod is empty".to_string());
        }
        Ok(())
    }
}

/// Revocation-status descriptor carried by a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialStatus {
    /// Status mechanism, e.g. `StatusList2021Entry`.
    #[serde(rename = "type")]
    pub status_type: String,

    /// Position in the status list, if the mechanism uses one.
    #[serde(rename = "statusListIndex", default, skip_serializing_if = "Option::is_none")]
    pub list_index: Option<u64>,

    /// `revocation` or `suspension`.
    #[serde(rename = "statusPurpose", default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}
