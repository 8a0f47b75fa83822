//! # Credential Keeper
//!
//! Owns the credential lifecycle: creation with fee collection and index
//! maintenance, and one-way revocation. Every method runs against the
//! [`Context`] of a single message; the caller commits or discards the
//! context's write-set as a unit.
//!
//! Validation always runs before the fee is charged and before anything
//! is written, so a rejected message does not even touch the write-set in
//! the common case.

use serde::Serialize;

use vcreg_core::{sha256_hex, CanonicalBytes, CredentialId, Did};

use crate::context::{BlockInfo, Context};
use crate::credential::{self, CredentialSubject, Provenance, VerifiableCredential};
use crate::error::RegistryError;
use crate::events::Event;
use crate::fee::{BankKeeper, FeeGate};
use crate::index::insert_indexes;
use crate::msgs::{MsgCreateCredential, MsgRevokeCredential};
use crate::resolver::IdentifierResolver;
use crate::revocation::{authorize_revocation, RevocationAuthority, RevocationRecord};
use crate::state::{
    credential_key, load_credential, load_params, revocation_key, CREDENTIALS,
    CREDENTIAL_SEQUENCE, REVOCATIONS,
};

/// Prefix of derived credential ids.
pub const CREDENTIAL_ID_PREFIX: &str = "urn:vcreg:credential:";

/// The registry's message handlers, parameterised over the host's bank and
/// account resolver.
#[derive(Debug, Clone)]
pub struct Keeper<B, R> {
    fees: FeeGate<B>,
    resolver: R,
}

#[derive(Serialize)]
struct CredentialIdSeed<'a> {
    issuer: &'a Did,
    #[serde(rename = "type")]
    credential_type: &'a [String],
    subject: &'a CredentialSubject,
    height: u64,
    tx_hash: &'a str,
    sequence: u64,
}

/// Derive a credential id from its content and position in the chain.
pub fn derive_credential_id(
    issuer: &Did,
    credential_type: &[String],
    subject: &CredentialSubject,
    block: &BlockInfo,
    sequence: u64,
) -> Result<CredentialId, RegistryError> {
    let seed = CredentialIdSeed {
        issuer,
        credential_type,
        subject,
        height: block.height,
        tx_hash: &block.tx_hash,
        sequence,
    };
    let bytes = CanonicalBytes::new(&seed)
        .map_err(|e| RegistryError::InvalidCredential(format!("credential is not encodable: {e}")))?;
    CredentialId::new(format!("{CREDENTIAL_ID_PREFIX}{}", sha256_hex(&bytes)))
        .map_err(|e| RegistryError::InvalidCredential(e.to_string()))
}

impl<B: BankKeeper, R: IdentifierResolver> Keeper<B, R> {
    /// Keeper charging fees through `bank` and resolving accounts with
    /// `resolver`.
    pub fn new(bank: B, resolver: R) -> Self {
        Self {
            fees: FeeGate::new(bank),
            resolver,
        }
    }

    /// The fee gate.
    pub fn fees(&self) -> &FeeGate<B> {
        &self.fees
    }

    pub(crate) fn resolve(&self, field: &'static str, account: &str) -> Result<Did, RegistryError> {
        self.resolver
            .resolve(account)
            .map_err(|reason| RegistryError::InvalidAccount {
                field,
                value: account.to_string(),
                reason,
            })
    }

    /// Create a credential and return its id.
    pub fn create_credential(
        &self,
        ctx: &mut Context<'_>,
        msg: MsgCreateCredential,
    ) -> Result<CredentialId, RegistryError> {
        let issuer = self
            .resolver
            .resolve(&msg.issuer)
            .map_err(|reason| RegistryError::InvalidIssuer {
                issuer: msg.issuer.clone(),
                reason,
            })?;
        credential::validate_types(&msg.credential_type)?;
        credential::validate_subject(&msg.subject)?;
        if let Some(status) = &msg.status {
            credential::validate_status(status)?;
        }
        if let Some(proof) = &msg.proof {
            proof.check_envelope().map_err(RegistryError::InvalidCredential)?;
        }

        let now = ctx.now();
        if let Some(exp) = msg.expiration_date {
            if exp < now {
                return Err(RegistryError::InvalidCredential(format!(
                    "expirationDate {exp} is before the current block time {now}"
                )));
            }
        }

        let params = load_params(ctx.store())?;
        let sequence = CREDENTIAL_SEQUENCE.load_or_default(ctx.store())?;
        let id = match msg.id {
            Some(id) => id,
            None => derive_credential_id(
                &issuer,
                &msg.credential_type,
                &msg.subject,
                ctx.block(),
                sequence,
            )?,
        };
        let key = credential_key(&id);
        if CREDENTIALS.has(ctx.store(), &key)? {
            return Err(RegistryError::CredentialAlreadyExists(id));
        }

        let record = VerifiableCredential {
            id,
            credential_type: msg.credential_type,
            issuer,
            credential_subject: msg.subject,
            issuance_date: now,
            expiration_date: msg.expiration_date,
            proof: msg.proof,
            credential_status: msg.status,
            provenance: Provenance {
                block_height: ctx.block().height,
                tx_hash: ctx.block().tx_hash.clone(),
                sequence,
            },
            active: true,
            revoked: false,
            revoked_at: None,
            updated_at: now,
        };
        let encoded = CanonicalBytes::new(&record).map_err(|e| {
            RegistryError::InvalidCredential(format!("credential is not encodable: {e}"))
        })?;
        let size = encoded.len() as u64;
        if size > params.max_credential_size {
            return Err(RegistryError::PayloadTooLarge {
                size,
                max: params.max_credential_size,
            });
        }
        let next_sequence = sequence.checked_add(1).ok_or_else(|| {
            RegistryError::InvalidCredential("credential sequence exhausted".to_string())
        })?;

        self.fees
            .charge(ctx.store_mut(), &record.issuer, &params.credential_fee)?;

        CREDENTIALS.set(ctx.store_mut(), key, &record)?;
        insert_indexes(ctx.store_mut(), &record)?;
        CREDENTIAL_SEQUENCE.save(ctx.store_mut(), &next_sequence)?;

        tracing::info!(
            id = %record.id,
            issuer = %record.issuer,
            subject = %record.credential_subject.id,
            height = ctx.block().height,
            size,
            "credential created"
        );
        ctx.emit(Event::CredentialCreated {
            id: record.id.clone(),
            issuer: record.issuer,
            subject: record.credential_subject.id,
        });
        Ok(record.id)
    }

    /// Revoke a credential. Revoking twice is an error.
    pub fn revoke_credential(
        &self,
        ctx: &mut Context<'_>,
        msg: MsgRevokeCredential,
    ) -> Result<(), RegistryError> {
        let mut record = load_credential(ctx.store(), &msg.credential_id)?
            .ok_or_else(|| RegistryError::CredentialNotFound(msg.credential_id.clone()))?;

        let role = match authorize_revocation(&record, &msg.revoker) {
            RevocationAuthority::Authorized(role) => role,
            RevocationAuthority::Unauthorized { reason } => {
                return Err(RegistryError::Unauthorized {
                    credential_id: msg.credential_id,
                    revoker: msg.revoker,
                    reason,
                });
            }
        };
        if record.revoked {
            return Err(RegistryError::AlreadyRevoked(msg.credential_id));
        }

        let now = ctx.now();
        record.mark_revoked(now);
        let revocation = RevocationRecord {
            credential_id: msg.credential_id,
            revoker: msg.revoker,
            reason: msg.reason,
            revoked_at: now,
            block_height: ctx.block().height,
        };
        CREDENTIALS.set(ctx.store_mut(), credential_key(&record.id), &record)?;
        REVOCATIONS.set(
            ctx.store_mut(),
            revocation_key(&revocation.credential_id),
            &revocation,
        )?;

        tracing::info!(
            id = %record.id,
            revoker = %revocation.revoker,
            role = role.as_str(),
            height = revocation.block_height,
            "credential revoked"
        );
        ctx.emit(Event::CredentialRevoked {
            id: revocation.credential_id,
            revoker: revocation.revoker,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::tests::ts;
    use crate::error::ErrorKind;
    use crate::fee::StoreBank;
    use crate::params::{Coin, Params};
    use crate::resolver::DidSyntaxResolver;
    use crate::state::PARAMS;
    use vcreg_store::MemoryStore;

    fn keeper() -> Keeper<StoreBank, DidSyntaxResolver> {
        Keeper::new(StoreBank::default(), DidSyntaxResolver)
    }

    fn block(height: u64) -> BlockInfo {
        BlockInfo {
            height,
            time: ts("2026-03-01T12:00:00Z"),
            tx_hash: format!("tx{height}"),
        }
    }

    fn create_msg(id: Option<&str>) -> MsgCreateCredential {
        MsgCreateCredential {
            id: id.map(|s| CredentialId::new(s).unwrap()),
            issuer: "did:x:issuer1".into(),
            credential_type: vec!["VerifiableCredential".into(), "KycAttestation".into()],
            subject: CredentialSubject::new("did:x:alice").with_claim("level", 2),
            proof: None,
            status: None,
            expiration_date: None,
        }
    }

    fn revoke_msg(id: &str, revoker: &str) -> MsgRevokeCredential {
        MsgRevokeCredential {
            credential_id: CredentialId::new(id).unwrap(),
            revoker: revoker.into(),
            reason: "compromised".into(),
        }
    }

    #[test]
    fn create_writes_record_with_block_provenance() {
        let mut store = MemoryStore::new();
        let mut ctx = Context::new(&mut store, block(5));
        let id = keeper().create_credential(&mut ctx, create_msg(Some("cred_1"))).unwrap();
        assert_eq!(ctx.events().len(), 1);

        let vc = load_credential(&store, &id).unwrap().unwrap();
        assert!(vc.active && !vc.revoked);
        assert_eq!(vc.issuance_date, ts("2026-03-01T12:00:00Z"));
        assert_eq!(vc.provenance.block_height, 5);
        assert_eq!(vc.provenance.tx_hash, "tx5");
        assert_eq!(vc.provenance.sequence, 0);
        assert_eq!(CREDENTIAL_SEQUENCE.may_load(&store).unwrap(), Some(1));
    }

    #[test]
    fn derived_ids_are_deterministic_and_distinct() {
        let mut a = MemoryStore::new();
        let mut b = MemoryStore::new();
        let id_a = keeper()
            .create_credential(&mut Context::new(&mut a, block(1)), create_msg(None))
            .unwrap();
        let id_b = keeper()
            .create_credential(&mut Context::new(&mut b, block(1)), create_msg(None))
            .unwrap();
        assert_eq!(id_a, id_b);
        assert!(id_a.as_str().starts_with(CREDENTIAL_ID_PREFIX));

        let id_c = keeper()
            .create_credential(&mut Context::new(&mut a, block(1)), create_msg(None))
            .unwrap();
        assert_ne!(id_a, id_c);
    }

    #[test]
    fn bad_issuer_is_invalid_issuer() {
        let mut store = MemoryStore::new();
        let mut msg = create_msg(None);
        msg.issuer = "issuer1".into();
        let err = keeper()
            .create_credential(&mut Context::new(&mut store, block(1)), msg)
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidIssuer { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn float_claims_are_rejected() {
        let mut store = MemoryStore::new();
        let mut msg = create_msg(Some("cred_1"));
        msg.subject = msg.subject.with_claim("score", 0.5);
        let err = keeper()
            .create_credential(&mut Context::new(&mut store, block(1)), msg)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn expiration_in_the_past_is_rejected() {
        let mut store = MemoryStore::new();
        let mut msg = create_msg(Some("cred_1"));
        msg.expiration_date = Some(ts("2026-03-01T11:59:59Z"));
        assert!(keeper()
            .create_credential(&mut Context::new(&mut store, block(1)), msg.clone())
            .is_err());
        msg.expiration_date = Some(ts("2026-03-01T12:00:00Z"));
        assert!(keeper()
            .create_credential(&mut Context::new(&mut store, block(1)), msg)
            .is_ok());
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let mut store = MemoryStore::new();
        PARAMS
            .save(
                &mut store,
                &Params {
                    max_credential_size: 64,
                    ..Params::default()
                },
            )
            .unwrap();
        let err = keeper()
            .create_credential(&mut Context::new(&mut store, block(1)), create_msg(Some("c")))
            .unwrap_err();
        assert!(matches!(err, RegistryError::PayloadTooLarge { max: 64, .. }));
    }

    #[test]
    fn fee_is_charged_to_issuer() {
        let mut store = MemoryStore::new();
        let k = keeper();
        PARAMS
            .save(
                &mut store,
                &Params {
                    credential_fee: Coin::new("uvcr", 10),
                    ..Params::default()
                },
            )
            .unwrap();
        let err = k
            .create_credential(&mut Context::new(&mut store, block(1)), create_msg(Some("c")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientResources);

        k.fees().bank().set_balance(&mut store, "did:x:issuer1", "uvcr", 25).unwrap();
        k.create_credential(&mut Context::new(&mut store, block(2)), create_msg(Some("c")))
            .unwrap();
        assert_eq!(k.fees().bank().balance(&store, "did:x:issuer1", "uvcr").unwrap(), 15);
    }

    #[test]
    fn revoke_by_subject_and_then_again() {
        let mut store = MemoryStore::new();
        let k = keeper();
        k.create_credential(&mut Context::new(&mut store, block(1)), create_msg(Some("cred_1")))
            .unwrap();

        let mut ctx = Context::new(&mut store, block(2));
        k.revoke_credential(&mut ctx, revoke_msg("cred_1", "did:x:alice")).unwrap();
        assert_eq!(ctx.events()[0].kind(), "credential_revoked");

        let err = k
            .revoke_credential(
                &mut Context::new(&mut store, block(3)),
                revoke_msg("cred_1", "did:x:issuer1"),
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRevoked(_)));
        let id = CredentialId::new("cred_1").unwrap();
        let vc = load_credential(&store, &id).unwrap().unwrap();
        assert!(!vc.is_usable_at(ts("2026-03-02T00:00:00Z")));
    }

    #[test]
    fn revoke_missing_credential() {
        let mut store = MemoryStore::new();
        let err = keeper()
            .revoke_credential(
                &mut Context::new(&mut store, block(1)),
                revoke_msg("nope", "did:x:issuer1"),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn non_did_subject_revokes_own_credential() {
        let mut store = MemoryStore::new();
        let k = keeper();
        let mut msg = create_msg(Some("cred_s"));
        msg.subject = CredentialSubject::new("urn:uuid:alice-1");
        k.create_credential(&mut Context::new(&mut store, block(1)), msg).unwrap();

        let mut ctx = Context::new(&mut store, block(2));
        k.revoke_credential(&mut ctx, revoke_msg("cred_s", "urn:uuid:alice-1")).unwrap();
        assert_eq!(
            ctx.events()[0],
            Event::CredentialRevoked {
                id: CredentialId::new("cred_s").unwrap(),
                revoker: "urn:uuid:alice-1".into(),
            }
        );

        let id = CredentialId::new("cred_s").unwrap();
        assert!(load_credential(&store, &id).unwrap().unwrap().revoked);
        let rec = REVOCATIONS.get(&store, &revocation_key(&id)).unwrap().unwrap();
        assert_eq!(rec.revoker, "urn:uuid:alice-1");
    }

    #[test]
    fn missing_credential_wins_over_malformed_revoker() {
        let mut store = MemoryStore::new();
        let err = keeper()
            .revoke_credential(
                &mut Context::new(&mut store, block(1)),
                revoke_msg("nope", "not a did"),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
