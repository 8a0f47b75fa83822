//! # vcreg-registry — Verifiable Credential Registry
//!
//! The deterministic state machine that creates, indexes, revokes, and
//! composes presentations of verifiable credentials anchored to DIDs.
//!
//! ## Components
//!
//! - **Credential keeper** (`keeper.rs`): `create_credential` and
//!   `revoke_credential`. Enforces id uniqueness, payload size, issuer
//!   resolution, and one-way revocation.
//!
//! - **Secondary indexes** (`index.rs`): issuer, holder, and type indexes,
//!   written in the same write-set as the primary record and never
//!   removed.
//!
//! - **Fee gate** (`fee.rs`): charges the submitter through a
//!   [`BankKeeper`] before anything is written.
//!
//! - **Presentation composer** (`composer.rs`): re-checks existence,
//!   revocation, and expiry of every referenced credential at composition
//!   time.
//!
//! - **Genesis** (`genesis.rs`): validated bulk import that rebuilds the
//!   indexes, and ordered export of the primary tables.
//!
//! - **Message server** (`msg_server.rs`): runs each message inside a
//!   write-set that is committed only on success.
//!
//! ## Execution Model
//!
//! Single-threaded and deterministic. The host delivers messages in order
//! together with a [`BlockInfo`]; the block time is the only clock. All
//! stored values are canonical JSON, so replicas applying the same
//! messages hold byte-identical state.

pub mod composer;
pub mod context;
pub mod credential;
pub mod error;
pub mod events;
pub mod fee;
pub mod genesis;
pub mod index;
pub mod keeper;
pub mod msg_server;
pub mod msgs;
pub mod params;
pub mod presentation;
pub mod proof;
pub mod query;
pub mod resolver;
pub mod revocation;
pub mod state;

pub use context::{BlockInfo, Context};
pub use credential::{is_expired, CredentialSubject, Provenance, VerifiableCredential};
pub use error::{ErrorKind, RegistryError};
pub use events::Event;
pub use fee::{BankKeeper, FeeError, FeeGate, StoreBank, DEFAULT_FEE_POOL};
pub use genesis::{export_genesis, import_genesis, GenesisState};
pub use index::IndexKind;
pub use keeper::Keeper;
pub use msg_server::{MsgResponse, MsgServer, TxResponse};
pub use msgs::{Msg, MsgCreateCredential, MsgCreatePresentation, MsgRevokeCredential};
pub use params::{Coin, Params};
pub use presentation::VerifiablePresentation;
pub use proof::{CredentialStatus, Proof};
pub use resolver::{DidSyntaxResolver, IdentifierResolver, KnownAccounts};
pub use revocation::{authorize_revocation, RevocationAuthority, RevocationRecord, RevokerRole};
