//! # Presentation Composer
//!
//! Builds a presentation from references to stored credentials. Each
//! reference is re-checked against the current block time on every
//! composition: a credential that was valid when issued may since have
//! been revoked or have expired.
//!
//! The reference check stops at the first bad credential and names it.
//! It runs only after the holder's payload (types, references, proof) has
//! passed the `max_credential_size` bound, so the number of credential
//! loads per message is bounded by the parameters.

use serde::Serialize;

use vcreg_core::{sha256_hex, CanonicalBytes, CredentialId, Did, PresentationId, Timestamp};
use vcreg_store::KvStore;

use crate::context::{BlockInfo, Context};
use crate::credential::VerifiableCredential;
use crate::error::RegistryError;
use crate::events::Event;
use crate::fee::BankKeeper;
use crate::keeper::Keeper;
use crate::msgs::MsgCreatePresentation;
use crate::presentation::{normalize_types, validate_references, VerifiablePresentation};
use crate::proof::Proof;
use crate::resolver::IdentifierResolver;
use crate::state::{load_credential, load_params, presentation_key, PRESENTATIONS, PRESENTATION_COUNT};

/// Prefix of derived presentation ids.
pub const PRESENTATION_ID_PREFIX: &str = "urn:vcreg:presentation:";

#[derive(Serialize)]
struct PresentationIdSeed<'a> {
    holder: &'a Did,
    #[serde(rename = "type")]
    presentation_type: &'a [String],
    credential_ids: &'a [CredentialId],
    height: u64,
    tx_hash: &'a str,
    counter: u64,
}

/// The holder-supplied part of a presentation, as it will be stored.
#[derive(Serialize)]
struct PresentationPayload<'a> {
    #[serde(rename = "type")]
    presentation_type: &'a [String],
    #[serde(rename = "verifiableCredential")]
    credential_ids: &'a [CredentialId],
    #[serde(skip_serializing_if = "Option::is_none")]
    proof: Option<&'a Proof>,
}

/// Derive a presentation id from its content and position in the chain.
pub fn derive_presentation_id(
    holder: &Did,
    presentation_type: &[String],
    credential_ids: &[CredentialId],
    block: &BlockInfo,
    counter: u64,
) -> Result<PresentationId, RegistryError> {
    let seed = PresentationIdSeed {
        holder,
        presentation_type,
        credential_ids,
        height: block.height,
        tx_hash: &block.tx_hash,
        counter,
    };
    let bytes = CanonicalBytes::new(&seed)
        .map_err(|e| RegistryError::InvalidPresentation(format!("not encodable: {e}")))?;
    PresentationId::new(format!("{PRESENTATION_ID_PREFIX}{}", sha256_hex(&bytes)))
        .map_err(|e| RegistryError::InvalidPresentation(e.to_string()))
}

/// Load every referenced credential and require it to exist, be
/// unrevoked, and be unexpired at `now`.
pub fn check_references<S: KvStore + ?Sized>(
    store: &S,
    ids: &[CredentialId],
    now: Timestamp,
) -> Result<Vec<VerifiableCredential>, RegistryError> {
    let mut credentials = Vec::with_capacity(ids.len());
    for id in ids {
        let vc = load_credential(store, id)?
            .ok_or_else(|| RegistryError::CredentialNotFound(id.clone()))?;
        if vc.revoked {
            return Err(RegistryError::CredentialRevoked(id.clone()));
        }
        if let Some(expired_at) = vc.expiration_date.filter(|_| vc.is_expired(now)) {
            return Err(RegistryError::CredentialExpired {
                id: id.clone(),
                expired_at,
            });
        }
        credentials.push(vc);
    }
    Ok(credentials)
}

impl<B: BankKeeper, R: IdentifierResolver> Keeper<B, R> {
    /// Compose a presentation and return its id.
    pub fn create_presentation(
        &self,
        ctx: &mut Context<'_>,
        msg: MsgCreatePresentation,
    ) -> Result<PresentationId, RegistryError> {
        let holder = self.resolve("holder", &msg.holder)?;
        let presentation_type = normalize_types(msg.presentation_type)?;
        validate_references(&msg.credential_ids)?;
        if let Some(proof) = &msg.proof {
            proof.check_envelope().map_err(RegistryError::InvalidPresentation)?;
        }

        let params = load_params(ctx.store())?;
        let payload = CanonicalBytes::new(&PresentationPayload {
            presentation_type: &presentation_type,
            credential_ids: &msg.credential_ids,
            proof: msg.proof.as_ref(),
        })
        .map_err(|e| RegistryError::InvalidPresentation(format!("not encodable: {e}")))?;
        let size = payload.len() as u64;
        if size > params.max_credential_size {
            return Err(RegistryError::PresentationTooLarge {
                size,
                max: params.max_credential_size,
            });
        }

        let now = ctx.now();
        check_references(ctx.store(), &msg.credential_ids, now)?;

        let counter = PRESENTATION_COUNT.load_or_default(ctx.store())?;
        let id = match msg.id {
            Some(id) => id,
            None => derive_presentation_id(
                &holder,
                &presentation_type,
                &msg.credential_ids,
                ctx.block(),
                counter,
            )?,
        };
        let key = presentation_key(&id);
        if PRESENTATIONS.has(ctx.store(), &key)? {
            return Err(RegistryError::PresentationAlreadyExists(id));
        }
        let next_counter = counter.checked_add(1).ok_or_else(|| {
            RegistryError::InvalidPresentation("presentation counter exhausted".to_string())
        })?;

        self.fees()
            .charge(ctx.store_mut(), &holder, &params.presentation_fee)?;

        let record = VerifiablePresentation {
            id,
            presentation_type,
            holder,
            credential_ids: msg.credential_ids,
            proof: msg.proof,
            created_at: now,
            block_height: ctx.block().height,
        };
        PRESENTATIONS.set(ctx.store_mut(), key, &record)?;
        PRESENTATION_COUNT.save(ctx.store_mut(), &next_counter)?;

        tracing::info!(
            id = %record.id,
            holder = %record.holder,
            credentials = record.credential_ids.len(),
            height = record.block_height,
            "presentation created"
        );
        ctx.emit(Event::PresentationCreated {
            id: record.id.clone(),
            holder: record.holder,
        });
        Ok(record.id)
    }
}
