//! End-to-end CLI flows over files on disk: validate a genesis document,
//! replay blocks on top of it, export, and query the exported state.

use std::collections::BTreeMap;
use std::path::Path;

use vcreg_cli::config::CliConfig;
use vcreg_cli::document::{read_document, write_document};
use vcreg_cli::genesis::load_genesis;
use vcreg_cli::query::{execute_query, QueryCommand};
use vcreg_cli::replay::{load_blocks, replay, run_replay, ReplayArgs};
use vcreg_registry::{import_genesis, Coin, ErrorKind, GenesisState, Params};
use vcreg_store::MemoryStore;

const BLOCKS: &str = r#"
- height: 1
  time: "2026-01-01T00:00:00Z"
  txs:
    - hash: "a1"
      msg:
        create_credential:
          id: cred_1
          issuer: did:x:issuer1
          type: [VerifiableCredential, UniversityDegree]
          credentialSubject:
            id: did:x:alice
            claims:
              degree: BSc
          expirationDate: "2027-01-01T00:00:00Z"
    - hash: "a2"
      msg:
        create_credential:
          id: cred_1
          issuer: did:x:issuer1
          type: [VerifiableCredential]
          credentialSubject: { id: did:x:bob }
- height: 2
  time: "2026-02-01T00:00:00Z"
  txs:
    - hash: "b1"
      msg:
        create_presentation:
          id: pres_1
          holder: did:x:alice
          verifiableCredential: [cred_1]
    - hash: "b2"
      msg:
        revoke_credential:
          credential_id: cred_1
          revoker: did:x:issuer1
          reason: superseded
"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

#[test]
fn replay_reports_each_tx_and_discards_failures() {
    let dir = tempfile::tempdir().unwrap();
    let blocks = load_blocks(&write(dir.path(), "blocks.yaml", BLOCKS)).unwrap();

    let report = replay(&GenesisState::default(), blocks, &CliConfig::default()).unwrap();
    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.failed(), 1);

    let dup = &report.outcomes[1];
    assert_eq!(dup.hash, "a2");
    assert_eq!(dup.msg, "create_credential");
    assert_eq!(dup.result.as_ref().unwrap_err().0, ErrorKind::Conflict);

    let state = &report.final_state;
    assert_eq!(state.credentials.len(), 1);
    assert!(state.credentials[0].revoked);
    assert_eq!(state.credentials[0].credential_subject.id, "did:x:alice");
    assert_eq!(state.revocations.len(), 1);
    assert_eq!(state.revocations[0].reason, "superseded");
    assert_eq!(state.presentations.len(), 1);
}

#[test]
fn run_replay_exits_two_on_failure_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let genesis = dir.path().join("genesis.json");
    write_document(&genesis, &GenesisState::default()).unwrap();
    let args = ReplayArgs {
        genesis,
        blocks: write(dir.path(), "blocks.yaml", BLOCKS),
        export: Some(dir.path().join("out.json")),
    };

    let code = run_replay(&args, &CliConfig::default()).unwrap();
    assert_eq!(code, 2);

    let exported = load_genesis(&dir.path().join("out.json")).unwrap();
    assert_eq!(exported.credentials.len(), 1);
    assert_eq!(exported.presentations.len(), 1);
}

#[test]
fn out_of_order_blocks_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let blocks = r#"
- height: 5
  time: "2026-01-01T00:00:00Z"
- height: 4
  time: "2026-01-02T00:00:00Z"
"#;
    let err = load_blocks(&write(dir.path(), "blocks.yaml", blocks)).unwrap_err();
    assert!(err.to_string().contains("heights must increase"));
}

#[test]
fn configured_balances_pay_fees() {
    let genesis = GenesisState {
        params: Params {
            credential_fee: Coin::new("uvcr", 10),
            ..Params::default()
        },
        ..GenesisState::default()
    };
    let dir = tempfile::tempdir().unwrap();
    let blocks = load_blocks(&write(dir.path(), "blocks.yaml", BLOCKS)).unwrap();

    // No funds: both creates fail, and everything after them has nothing to act on.
    let broke = replay(&genesis, blocks.clone(), &CliConfig::default()).unwrap();
    assert_eq!(broke.failed(), 4);
    assert!(broke.final_state.credentials.is_empty());
    assert_eq!(
        broke.outcomes[0].result.as_ref().unwrap_err().0,
        ErrorKind::InsufficientResources
    );

    let mut balances = BTreeMap::new();
    balances.insert("did:x:issuer1".to_string(), 15);
    let funded = CliConfig {
        balances,
        ..CliConfig::default()
    };
    let report = replay(&genesis, blocks, &funded).unwrap();
    assert_eq!(report.failed(), 1);
    assert_eq!(report.final_state.credentials.len(), 1);
}

// ---------------------------------------------------------------------------
// Genesis and query
// ---------------------------------------------------------------------------

#[test]
fn invalid_genesis_fails_validation_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "genesis.json",
        r#"{"params": {"max_credential_size": 0, "credential_fee": {"denom": "uvcr", "amount": 0}, "presentation_fee": {"denom": "uvcr", "amount": 0}}}"#,
    );
    let err = load_genesis(&path).unwrap_err();
    assert!(format!("{err:#}").contains("genesis.json failed validation"));
}

#[test]
fn exported_state_answers_queries() {
    let dir = tempfile::tempdir().unwrap();
    let blocks = load_blocks(&write(dir.path(), "blocks.yaml", BLOCKS)).unwrap();
    let report = replay(&GenesisState::default(), blocks, &CliConfig::default()).unwrap();

    let out = dir.path().join("state.yaml");
    write_document(&out, &report.final_state).unwrap();
    let state: GenesisState = read_document(&out).unwrap();
    assert_eq!(state, report.final_state);

    let mut store = MemoryStore::new();
    import_genesis(&mut store, &state).unwrap();

    let by_holder = execute_query(
        &store,
        &QueryCommand::ByHolder {
            holder: "did:x:alice".into(),
        },
    )
    .unwrap();
    assert_eq!(by_holder.as_array().unwrap().len(), 1);
    assert_eq!(by_holder[0]["id"], "cred_1");

    let cred = execute_query(
        &store,
        &QueryCommand::Credential {
            id: "cred_1".into(),
        },
    )
    .unwrap();
    assert_eq!(cred["credential"]["revoked"], true);
    assert_eq!(cred["revocation"]["reason"], "superseded");

    let params = execute_query(&store, &QueryCommand::Params).unwrap();
    assert_eq!(params["credential_count"], 1);
    assert_eq!(params["presentation_count"], 1);
}
