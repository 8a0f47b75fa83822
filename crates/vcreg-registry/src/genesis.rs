//! # Genesis Import/Export
//!
//! A genesis document holds the primary records only: params, credentials,
//! revocations, presentations. Indexes and counters are derived state;
//! import rebuilds them exactly as the message handlers would have written
//! them, and export never reads them.
//!
//! Import validates the whole document before writing anything, then
//! writes through a [`CacheStore`] so a store failure midway leaves the
//! target untouched.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use vcreg_core::CanonicalBytes;
use vcreg_store::{CacheStore, KvStore};

use crate::credential::VerifiableCredential;
use crate::error::RegistryError;
use crate::index::insert_indexes;
use crate::params::Params;
use crate::presentation::VerifiablePresentation;
use crate::revocation::{authorize_revocation, RevocationAuthority, RevocationRecord};
use crate::state::{
    credential_key, load_params, presentation_key, revocation_key, CREDENTIALS,
    CREDENTIAL_SEQUENCE, PARAMS, PRESENTATIONS, PRESENTATION_COUNT, REVOCATIONS,
};

/// Full registry state as exchanged at chain bootstrap or migration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisState {
    /// Module parameters.
    #[serde(default)]
    pub params: Params,
    /// Credentials.
    #[serde(default)]
    pub credentials: Vec<VerifiableCredential>,
    /// Revocation records.
    #[serde(default)]
    pub revocations: Vec<RevocationRecord>,
    /// Presentations.
    #[serde(default)]
    pub presentations: Vec<VerifiablePresentation>,
}

fn invalid(msg: String) -> RegistryError {
    RegistryError::InvalidGenesis(msg)
}

impl GenesisState {
    /// Check the document. Nothing is written.
    pub fn validate(&self) -> Result<(), RegistryError> {
        self.params
            .validate()
            .map_err(|e| invalid(e.to_string()))?;

        let mut by_id: BTreeMap<&str, &VerifiableCredential> = BTreeMap::new();
        let mut sequences = BTreeSet::new();
        for vc in &self.credentials {
            if by_id.insert(vc.id.as_str(), vc).is_some() {
                return Err(invalid(format!("duplicate credential id {}", vc.id)));
            }
            if !sequences.insert(vc.provenance.sequence) {
                return Err(invalid(format!(
                    "duplicate credential sequence {} (credential {})",
                    vc.provenance.sequence, vc.id
                )));
            }
            vc.validate().map_err(|e| invalid(e.to_string()))?;
            CanonicalBytes::new(vc)
                .map_err(|e| invalid(format!("credential {} is not encodable: {e}", vc.id)))?;
        }
        if sequences.last() == Some(&u64::MAX) {
            return Err(invalid("credential sequence u64::MAX leaves no successor".to_string()));
        }

        let mut revoked = BTreeSet::new();
        for rev in &self.revocations {
            if !revoked.insert(rev.credential_id.as_str()) {
                return Err(invalid(format!(
                    "duplicate revocation for credential {}",
                    rev.credential_id
                )));
            }
            match by_id.get(rev.credential_id.as_str()) {
                None => {
                    return Err(invalid(format!(
                        "revocation names unknown credential {}",
                        rev.credential_id
                    )))
                }
                Some(vc) if !vc.revoked => {
                    return Err(invalid(format!(
                        "credential {} has a revocation record but is not revoked",
                        vc.id
                    )))
                }
                Some(vc) => {
                    if vc.revoked_at != Some(rev.revoked_at) {
                        return Err(invalid(format!(
                            "revocation of {} is dated {} but the credential says {}",
                            vc.id,
                            rev.revoked_at,
                            vc.revoked_at.map_or_else(|| "never".to_string(), |t| t.to_string())
                        )));
                    }
                    if let RevocationAuthority::Unauthorized { reason } =
                        authorize_revocation(vc, &rev.revoker)
                    {
                        return Err(invalid(format!(
                            "revocation of {} by {}: {reason}",
                            vc.id, rev.revoker
                        )));
                    }
                }
            }
        }
        if let Some(vc) = self
            .credentials
            .iter()
            .find(|vc| vc.revoked && !revoked.contains(vc.id.as_str()))
        {
            return Err(invalid(format!(
                "credential {} is revoked but has no revocation record",
                vc.id
            )));
        }

        let mut presentation_ids = BTreeSet::new();
        for vp in &self.presentations {
            if !presentation_ids.insert(vp.id.as_str()) {
                return Err(invalid(format!("duplicate presentation id {}", vp.id)));
            }
            vp.validate().map_err(|e| invalid(format!("presentation {}: {e}", vp.id)))?;
            if let Some(missing) = vp
                .credential_ids
                .iter()
                .find(|id| !by_id.contains_key(id.as_str()))
            {
                return Err(invalid(format!(
                    "presentation {} references unknown credential {missing}",
                    vp.id
                )));
            }
        }
        Ok(())
    }
}

/// Validate `genesis` and load it into `store`.
pub fn import_genesis<S: KvStore + ?Sized>(
    store: &mut S,
    genesis: &GenesisState,
) -> Result<(), RegistryError> {
    genesis.validate()?;

    let mut cache = CacheStore::new(store);
    PARAMS.save(&mut cache, &genesis.params)?;
    for vc in &genesis.credentials {
        CREDENTIALS.set(&mut cache, credential_key(&vc.id), vc)?;
        insert_indexes(&mut cache, vc)?;
    }
    for rev in &genesis.revocations {
        REVOCATIONS.set(&mut cache, revocation_key(&rev.credential_id), rev)?;
    }
    for vp in &genesis.presentations {
        PRESENTATIONS.set(&mut cache, presentation_key(&vp.id), vp)?;
    }
    let next_sequence = genesis
        .credentials
        .iter()
        .map(|vc| vc.provenance.sequence + 1)
        .max()
        .unwrap_or(0);
    CREDENTIAL_SEQUENCE.save(&mut cache, &next_sequence)?;
    PRESENTATION_COUNT.save(&mut cache, &(genesis.presentations.len() as u64))?;
    cache.commit()?;

    tracing::info!(
        credentials = genesis.credentials.len(),
        revocations = genesis.revocations.len(),
        presentations = genesis.presentations.len(),
        next_sequence,
        "genesis imported"
    );
    Ok(())
}

/// Snapshot the primary tables in key order.
pub fn export_genesis<S: KvStore + ?Sized>(store: &S) -> Result<GenesisState, RegistryError> {
    Ok(GenesisState {
        params: load_params(store)?,
        credentials: values(CREDENTIALS.entries(store)?),
        revocations: values(REVOCATIONS.entries(store)?),
        presentations: values(PRESENTATIONS.entries(store)?),
    })
}

fn values<V>(entries: Vec<(Vec<u8>, V)>) -> Vec<V> {
    entries.into_iter().map(|(_, v)| v).collect()
}
