//! # Credential Records
//!
//! The stored form of a verifiable credential: the W3C envelope (type,
//! issuer, subject, dates, proof, status) plus the chain provenance and
//! lifecycle fields the registry maintains.
//!
//! ## Invariants
//!
//! - `credential_type` is non-empty, with no blank or repeated tags.
//! - `credential_subject.id` is non-empty.
//! - `expiration_date`, when present, is not before `issuance_date`.
//! - `revoked_at.is_some() == revoked`, and `revoked` never goes back to
//!   `false` (only [`VerifiableCredential::mark_revoked()`] touches it).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use vcreg_core::{CredentialId, Did, Timestamp};

use crate::error::RegistryError;
use crate::proof::{CredentialStatus, Proof};

/// Base credential type tag.
pub const VC_TYPE: &str = "VerifiableCredential";

/// The subject of a credential and the claims made about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialSubject {
    /// Subject identifier. Also the holder key in the holder index.
    pub id: String,

    /// Open-ended claims. Values must be float-free.
    #[serde(default)]
    pub claims: Map<String, Value>,
}

impl CredentialSubject {
    /// A subject with no claims.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            claims: Map::new(),
        }
    }

    /// Add a claim, builder style.
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }
}

/// Where and when a credential entered the ledger. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Provenance {
    /// Block height of the creating transaction.
    pub block_height: u64,
    /// Hash of the creating transaction.
    pub tx_hash: String,
    /// Creation order across the whole registry. Orders index scans.
    pub sequence: u64,
}

/// A stored verifiable credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifiableCredential {
    /// Unique for the lifetime of the registry.
    pub id: CredentialId,

    /// Ordered set of type tags.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,

    /// Issuing party.
    pub issuer: Did,

    /// Subject and claims.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: CredentialSubject,

    /// Block time of creation.
    #[serde(rename = "issuanceDate")]
    pub issuance_date: Timestamp,

    /// Absent means the credential never expires.
    #[serde(rename = "expirationDate", default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Timestamp>,

    /// Opaque proof, stored and forwarded only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,

    /// Revocation-status descriptor.
    #[serde(rename = "credentialStatus", default, skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<CredentialStatus>,

    /// Chain provenance.
    pub provenance: Provenance,

    /// Lifecycle flag set at creation.
    pub active: bool,

    /// One-way revocation flag.
    pub revoked: bool,

    /// Set exactly when `revoked` is true.
    #[serde(rename = "revokedAt", default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<Timestamp>,

    /// Last lifecycle change.
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

/// True iff `expiration` is set and `now` is strictly after it.
pub fn is_expired(expiration: Option<Timestamp>, now: Timestamp) -> bool {
    matches!(expiration, Some(exp) if now > exp)
}

impl VerifiableCredential {
    /// Whether the credential has expired at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        is_expired(self.expiration_date, now)
    }

    /// Neither revoked nor expired at `now`.
    pub fn is_usable_at(&self, now: Timestamp) -> bool {
        !self.revoked && !self.is_expired(now)
    }

    /// Flip the credential to revoked. Callers check for an existing
    /// revocation first; calling this twice keeps the first `revoked_at`.
    pub fn mark_revoked(&mut self, at: Timestamp) {
        if self.revoked {
            return;
        }
        self.revoked = true;
        self.revoked_at = Some(at);
        self.updated_at = at;
    }

    /// Check every record-level invariant.
    pub fn validate(&self) -> Result<(), RegistryError> {
        validate_types(&self.credential_type)?;
        validate_subject(&self.credential_subject)?;
        validate_expiration(self.issuance_date, self.expiration_date)?;
        if let Some(proof) = &self.proof {
            proof.check_envelope().map_err(RegistryError::InvalidCredential)?;
        }
        if let Some(status) = &self.credential_status {
            validate_status(status)?;
        }
        if self.revoked != self.revoked_at.is_some() {
            return Err(RegistryError::InvalidCredential(format!(
                "credential {}: revoked={} but revokedAt is {}",
                self.id,
                self.revoked,
                if self.revoked_at.is_some() { "set" } else { "unset" }
            )));
        }
        Ok(())
    }
}

/// Type tags: non-empty list, no blank tags, no repeats.
pub fn validate_types(types: &[String]) -> Result<(), RegistryError> {
    if types.is_empty() {
        return Err(RegistryError::InvalidCredential(
            "type must contain at least one tag".to_string(),
        ));
    }
    let mut seen = BTreeSet::new();
    for (i, tag) in types.iter().enumerate() {
        if tag.trim().is_empty() {
            return Err(RegistryError::InvalidCredential(format!("type[{i}] is empty")));
        }
        if !seen.insert(tag.as_str()) {
            return Err(RegistryError::InvalidCredential(format!(
                "type tag {tag:?} is repeated"
            )));
        }
    }
    Ok(())
}

/// Subject must name someone.
pub fn validate_subject(subject: &CredentialSubject) -> Result<(), RegistryError> {
    if subject.id.trim().is_empty() {
        return Err(RegistryError::InvalidCredential(
            "credentialSubject.id is empty".to_string(),
        ));
    }
    Ok(())
}

/// Expiration may equal but not precede issuance.
pub fn validate_expiration(
    issued: Timestamp,
    expiration: Option<Timestamp>,
) -> Result<(), RegistryError> {
    match expiration {
        Some(exp) if exp < issued => Err(RegistryError::InvalidCredential(format!(
            "expirationDate {exp} precedes issuanceDate {issued}"
        ))),
        _ => Ok(()),
    }
}

/// Status descriptor must name its mechanism.
pub fn validate_status(status: &CredentialStatus) -> Result<(), RegistryError> {
    if status.status_type.trim().is_empty() {
        return Err(RegistryError::InvalidCredential(
            "credentialStatus type is empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    pub(crate) fn sample(id: &str) -> VerifiableCredential {
        VerifiableCredential {
            id: CredentialId::new(id).unwrap(),
            credential_type: vec![VC_TYPE.into(), "UniversityDegree".into()],
            issuer: Did::parse("did:x:issuer1").unwrap(),
            credential_subject: CredentialSubject::new("did:x:alice").with_claim("degree", "BSc"),
            issuance_date: ts("2026-01-01T00:00:00Z"),
            expiration_date: Some(ts("2027-01-01T00:00:00Z")),
            proof: None,
            credential_status: None,
            provenance: Provenance {
                block_height: 1,
                tx_hash: "tx1".into(),
                sequence: 0,
            },
            active: true,
            revoked: false,
            revoked_at: None,
            updated_at: ts("2026-01-01T00:00:00Z"),
        }
    }

    #[test]
    fn expiry_is_strictly_after() {
        let exp = ts("2026-06-01T00:00:00Z");
        assert!(!is_expired(Some(exp), ts("2026-05-31T23:59:59Z")));
        assert!(!is_expired(Some(exp), exp));
        assert!(is_expired(Some(exp), ts("2026-06-01T00:00:01Z")));
        assert!(!is_expired(None, ts("2999-01-01T00:00:00Z")));
    }

    #[test]
    fn epoch_expiration_is_not_absent() {
        let epoch = Timestamp::from_epoch_secs(0).unwrap();
        assert!(is_expired(Some(epoch), ts("2026-01-01T00:00:00Z")));
    }

    #[test]
    fn sample_is_valid() {
        sample("cred_1").validate().unwrap();
    }

    #[test]
    fn type_rules() {
        assert!(validate_types(&[]).is_err());
        assert!(validate_types(&["".into()]).is_err());
        assert!(validate_types(&["A".into(), "A".into()]).is_err());
        assert!(validate_types(&["A".into(), "B".into()]).is_ok());
    }

    #[test]
    fn expiration_before_issuance_rejected() {
        let mut vc = sample("cred_1");
        vc.expiration_date = Some(ts("2025-12-31T23:59:59Z"));
        assert!(matches!(vc.validate(), Err(RegistryError::InvalidCredential(_))));
        vc.expiration_date = Some(vc.issuance_date);
        assert!(vc.validate().is_ok());
    }

    #[test]
    fn revoked_flag_and_timestamp_must_agree() {
        let mut vc = sample("cred_1");
        vc.revoked = true;
        assert!(vc.validate().is_err());
        vc.revoked_at = Some(ts("2026-02-01T00:00:00Z"));
        assert!(vc.validate().is_ok());
    }

    #[test]
    fn mark_revoked_is_one_way() {
        let mut vc = sample("cred_1");
        let first = ts("2026-02-01T00:00:00Z");
        vc.mark_revoked(first);
        vc.mark_revoked(ts("2026-03-01T00:00:00Z"));
        assert!(vc.revoked);
        assert_eq!(vc.revoked_at, Some(first));
        assert_eq!(vc.updated_at, first);
        assert!(!vc.is_usable_at(ts("2026-02-02T00:00:00Z")));
    }

    #[test]
    fn serde_uses_w3c_names_and_omits_absent_options() {
        let mut vc = sample("cred_1");
        vc.expiration_date = None;
        let json = serde_json::to_value(&vc).unwrap();
        assert_eq!(json["credentialSubject"]["id"], "did:x:alice");
        assert_eq!(json["type"][1], "UniversityDegree");
        assert!(json.get("expirationDate").is_none());
        assert!(json.get("revokedAt").is_none());
        let back: VerifiableCredential = serde_json::from_value(json).unwrap();
        assert_eq!(back, vc);
    }
}
