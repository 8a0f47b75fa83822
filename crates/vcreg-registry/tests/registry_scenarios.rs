//! # Registry Lifecycle Scenarios
//!
//! Drives the registry through the message server against an in-memory
//! store, the way the host runtime would:
//! 1. Create a credential and find it by issuer
//! 2. Reject a duplicate id without touching state
//! 3. Reject revocation by a third party
//! 4. Revoke as issuer
//! 5. Reject a presentation citing the revoked credential
//! 6. Export, wipe, import, and find the revoked credential again

use vcreg_core::{CredentialId, Timestamp};
use vcreg_registry::{
    export_genesis, import_genesis, query, BlockInfo, Coin, CredentialSubject, DidSyntaxResolver,
    ErrorKind, Event, GenesisState, Keeper, Msg, MsgCreateCredential, MsgCreatePresentation,
    MsgResponse, MsgRevokeCredential, MsgServer, Params, RegistryError, StoreBank,
};
use vcreg_store::MemoryStore;

type Server = MsgServer<StoreBank, DidSyntaxResolver>;

fn server() -> Server {
    MsgServer::new(Keeper::new(StoreBank::default(), DidSyntaxResolver))
}

fn block(height: u64) -> BlockInfo {
    BlockInfo {
        height,
        time: Timestamp::from_epoch_secs(1_767_225_600 + height as i64 * 6).unwrap(),
        tx_hash: format!("{height:064x}"),
    }
}

fn cid(s: &str) -> CredentialId {
    CredentialId::new(s).unwrap()
}

fn create(id: &str, issuer: &str, subject: &str) -> Msg {
    MsgCreateCredential {
        id: Some(cid(id)),
        issuer: issuer.into(),
        credential_type: vec!["VerifiableCredential".into(), "UniversityDegree".into()],
        subject: CredentialSubject::new(subject).with_claim("degree", "BSc"),
        proof: None,
        status: None,
        expiration_date: None,
    }
    .into()
}

fn revoke(id: &str, revoker: &str) -> Msg {
    MsgRevokeCredential {
        credential_id: cid(id),
        revoker: revoker.into(),
        reason: "superseded".into(),
    }
    .into()
}

fn present(holder: &str, ids: &[&str]) -> Msg {
    MsgCreatePresentation {
        id: None,
        holder: holder.into(),
        presentation_type: vec![],
        credential_ids: ids.iter().map(|s| cid(s)).collect(),
        proof: None,
    }
    .into()
}

fn ids(creds: &[vcreg_registry::VerifiableCredential]) -> Vec<&str> {
    creds.iter().map(|vc| vc.id.as_str()).collect()
}

fn fresh_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    import_genesis(&mut store, &GenesisState::default()).unwrap();
    store
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn full_lifecycle() {
    let srv = server();
    let mut store = fresh_store();

    // 1. create
    let resp = srv
        .deliver(&mut store, &block(1), create("cred_1", "did:x:issuer1", "did:x:alice"))
        .unwrap();
    assert_eq!(resp.response, MsgResponse::CreateCredential { id: cid("cred_1") });
    assert_eq!(
        resp.events[0].to_string(),
        "credential_created id=cred_1 issuer=did:x:issuer1 subject=did:x:alice"
    );
    let by_issuer = query::credentials_by_issuer(&store, "did:x:issuer1").unwrap();
    assert_eq!(ids(&by_issuer), vec!["cred_1"]);

    // 2. duplicate id
    let before = store.clone();
    let err = srv
        .deliver(&mut store, &block(2), create("cred_1", "did:x:issuer2", "did:x:carol"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(store, before);
    assert_eq!(query::credential_count(&store).unwrap(), 1);

    // 3. third-party revocation
    let err = srv
        .deliver(&mut store, &block(3), revoke("cred_1", "did:x:bob"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(!query::credential(&store, &cid("cred_1")).unwrap().revoked);

    // 4. issuer revocation
    let resp = srv
        .deliver(&mut store, &block(4), revoke("cred_1", "did:x:issuer1"))
        .unwrap();
    assert_eq!(
        resp.events,
        vec![Event::CredentialRevoked {
            id: cid("cred_1"),
            revoker: "did:x:issuer1".into(),
        }]
    );
    let vc = query::credential(&store, &cid("cred_1")).unwrap();
    assert!(vc.revoked);
    assert_eq!(vc.revoked_at, Some(block(4).time));
    let rec = query::revocation(&store, &cid("cred_1")).unwrap();
    assert_eq!(rec.reason, "superseded");

    // 5. presentation citing the revoked credential
    let err = srv
        .deliver(&mut store, &block(5), present("did:x:alice", &["cred_1"]))
        .unwrap_err();
    assert!(matches!(err, RegistryError::CredentialRevoked(ref id) if id.as_str() == "cred_1"));
    assert!(err.to_string().contains("cred_1"));

    // 6. export, wipe, import
    let exported = export_genesis(&store).unwrap();
    let mut restored = MemoryStore::new();
    import_genesis(&mut restored, &exported).unwrap();
    let by_issuer = query::credentials_by_issuer(&restored, "did:x:issuer1").unwrap();
    assert_eq!(ids(&by_issuer), vec!["cred_1"]);
    assert!(by_issuer[0].revoked);
    assert_eq!(restored, store);
}

#[test]
fn revocation_keeps_index_entries() {
    let srv = server();
    let mut store = fresh_store();
    srv.deliver(&mut store, &block(1), create("c1", "did:x:issuer1", "did:x:alice"))
        .unwrap();
    srv.deliver(&mut store, &block(2), revoke("c1", "did:x:alice"))
        .unwrap();

    assert_eq!(query::credentials_by_holder(&store, "did:x:alice").unwrap().len(), 1);
    assert_eq!(query::credentials_by_type(&store, "UniversityDegree").unwrap().len(), 1);
}

#[test]
fn presentation_valid_before_revocation_fails_after() {
    let srv = server();
    let mut store = fresh_store();
    srv.deliver(&mut store, &block(1), create("c1", "did:x:issuer1", "did:x:alice"))
        .unwrap();
    srv.deliver(&mut store, &block(1), create("c2", "did:x:issuer1", "did:x:alice"))
        .unwrap();

    let resp = srv
        .deliver(&mut store, &block(2), present("did:x:alice", &["c1", "c2"]))
        .unwrap();
    let MsgResponse::CreatePresentation { id } = resp.response else {
        panic!("unexpected response {:?}", resp.response);
    };
    assert_eq!(query::presentation(&store, &id).unwrap().credential_ids.len(), 2);

    srv.deliver(&mut store, &block(3), revoke("c2", "did:x:issuer1"))
        .unwrap();
    let err = srv
        .deliver(&mut store, &block(4), present("did:x:alice", &["c1", "c2"]))
        .unwrap_err();
    assert!(matches!(err, RegistryError::CredentialRevoked(ref id) if id.as_str() == "c2"));
    assert_eq!(query::presentation_count(&store).unwrap(), 1);
}

#[test]
fn subject_without_did_can_revoke_own_credential() {
    let srv = server();
    let mut store = fresh_store();
    srv.deliver(&mut store, &block(1), create("cred_s", "did:x:issuer1", "urn:uuid:alice-1"))
        .unwrap();

    let err = srv
        .deliver(&mut store, &block(2), revoke("cred_s", "urn:uuid:alice-2"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    srv.deliver(&mut store, &block(3), revoke("cred_s", "urn:uuid:alice-1"))
        .unwrap();
    let vc = query::credential(&store, &cid("cred_s")).unwrap();
    assert!(vc.revoked);
    assert_eq!(query::revocation(&store, &cid("cred_s")).unwrap().revoker, "urn:uuid:alice-1");

    let mut restored = MemoryStore::new();
    import_genesis(&mut restored, &export_genesis(&store).unwrap()).unwrap();
    assert_eq!(restored, store);
}

#[test]
fn expired_credential_cannot_be_presented() {
    let srv = server();
    let mut store = fresh_store();
    let mut msg = MsgCreateCredential {
        id: Some(cid("short")),
        issuer: "did:x:issuer1".into(),
        credential_type: vec!["VerifiableCredential".into()],
        subject: CredentialSubject::new("did:x:alice"),
        proof: None,
        status: None,
        expiration_date: None,
    };
    msg.expiration_date = Some(block(2).time);
    srv.deliver(&mut store, &block(1), msg.into()).unwrap();

    srv.deliver(&mut store, &block(2), present("did:x:alice", &["short"]))
        .unwrap();
    let err = srv
        .deliver(&mut store, &block(3), present("did:x:alice", &["short"]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Temporal);
    assert!(err.to_string().contains("short"));
    assert!(!query::credential(&store, &cid("short")).unwrap().revoked);
}

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

#[test]
fn fees_flow_to_pool_and_block_underfunded_submitters() {
    let srv = server();
    let mut store = MemoryStore::new();
    let genesis = GenesisState {
        params: Params {
            credential_fee: Coin::new("uvcr", 10),
            presentation_fee: Coin::new("uvcr", 3),
            ..Params::default()
        },
        ..GenesisState::default()
    };
    import_genesis(&mut store, &genesis).unwrap();
    let bank = srv.keeper().fees().bank();
    bank.set_balance(&mut store, "did:x:issuer1", "uvcr", 15).unwrap();
    bank.set_balance(&mut store, "did:x:alice", "uvcr", 2).unwrap();

    srv.deliver(&mut store, &block(1), create("c1", "did:x:issuer1", "did:x:alice"))
        .unwrap();
    let err = srv
        .deliver(&mut store, &block(2), create("c2", "did:x:issuer1", "did:x:alice"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientResources);
    assert!(query::credential(&store, &cid("c2")).is_err());

    let err = srv
        .deliver(&mut store, &block(3), present("did:x:alice", &["c1"]))
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::InsufficientFunds { required: 3, available: 2, .. }
    ));

    assert_eq!(bank.balance(&store, "did:x:issuer1", "uvcr").unwrap(), 5);
    assert_eq!(bank.balance(&store, bank.pool(), "uvcr").unwrap(), 10);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn malformed_messages_are_validation_errors() {
    let srv = server();
    let mut store = fresh_store();

    let err = srv
        .deliver(&mut store, &block(1), create("c1", "not-a-did", "did:x:alice"))
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidIssuer { .. }));

    let err = srv
        .deliver(&mut store, &block(1), create("c1", "did:x:issuer1", " "))
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidCredential(_)));

    let err = srv
        .deliver(&mut store, &block(1), present("did:x:alice", &[]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = srv
        .deliver(&mut store, &block(1), present("did:x:alice", &["ghost"]))
        .unwrap_err();
    assert!(matches!(err, RegistryError::CredentialNotFound(ref id) if id.as_str() == "ghost"));

    assert_eq!(store, fresh_store());
}
