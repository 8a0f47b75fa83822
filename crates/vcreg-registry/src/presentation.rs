//! Verifiable presentations: a holder's bundle of references to existing
//! credentials. The referenced credentials are checked when the
//! presentation is composed; the stored record only keeps their ids.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use vcreg_core::{CredentialId, Did, PresentationId, Timestamp};

use crate::error::RegistryError;
use crate::proof::Proof;

/// Type tag used when the caller supplies none.
pub const VP_TYPE: &str = "VerifiablePresentation";

/// A stored verifiable presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifiablePresentation {
    /// Unique presentation id.
    pub id: PresentationId,

    /// Type tags.
    #[serde(rename = "type")]
    pub presentation_type: Vec<String>,

    /// Composing party and fee payer.
    pub holder: Did,

    /// Referenced credentials, in the order the holder listed them.
    #[serde(rename = "verifiableCredential")]
    pub credential_ids: Vec<CredentialId>,

    /// Holder's proof, stored and forwarded only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,

    /// Block time of composition.
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,

    /// Block height of composition.
    pub block_height: u64,
}

impl VerifiablePresentation {
    /// Structural checks shared by composition and genesis import.
    pub fn validate(&self) -> Result<(), RegistryError> {
        validate_types(&self.presentation_type)?;
        validate_references(&self.credential_ids)?;
        if let Some(proof) = &self.proof {
            proof.check_envelope().map_err(RegistryError::InvalidPresentation)?;
        }
        Ok(())
    }
}

/// Fill in the default type tag and reject blank or repeated tags.
pub fn normalize_types(types: Vec<String>) -> Result<Vec<String>, RegistryError> {
    let types = if types.is_empty() {
        vec![VP_TYPE.to_string()]
    } else {
        types
    };
    validate_types(&types)?;
    Ok(types)
}

fn validate_types(types: &[String]) -> Result<(), RegistryError> {
    if types.is_empty() {
        return Err(RegistryError::InvalidPresentation("type is empty".to_string()));
    }
    let mut seen = BTreeSet::new();
    for (i, tag) in types.iter().enumerate() {
        if tag.trim().is_empty() {
            return Err(RegistryError::InvalidPresentation(format!("type[{i}] is empty")));
        }
        if !seen.insert(tag.as_str()) {
            return Err(RegistryError::InvalidPresentation(format!(
                "type tag {tag:?} is repeated"
            )));
        }
    }
    Ok(())
}

/// The reference list must be non-empty and name each credential once.
pub fn validate_references(ids: &[CredentialId]) -> Result<(), RegistryError> {
    if ids.is_empty() {
        return Err(RegistryError::InvalidPresentation(
            "must reference at least one credential".to_string(),
        ));
    }
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(RegistryError::InvalidPresentation(format!(
                "credential {id} is referenced twice"
            )));
        }
    }
    Ok(())
}
