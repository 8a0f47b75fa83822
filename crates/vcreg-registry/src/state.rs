//! Store layout.
//!
//! | Prefix | Contents |
//! |---|---|
//! | `0x01` | credential id → credential |
//! | `0x02` | issuer index |
//! | `0x03` | holder index |
//! | `0x04` | type index |
//! | `0x05` | credential id → revocation record |
//! | `0x06` | presentation id → presentation |
//! | `0x07` | params |
//! | `0x08` | next credential sequence |
//! | `0x09` | presentation counter |
//! | `0x10` | reference bank balances |

use vcreg_core::{CredentialId, PresentationId};
use vcreg_store::{Item, KvStore, StoreError, Table};

use crate::credential::VerifiableCredential;
use crate::params::Params;
use crate::presentation::VerifiablePresentation;
use crate::revocation::RevocationRecord;

/// Primary credential table.
pub const CREDENTIALS: Table<VerifiableCredential> = Table::new(0x01, "credentials");
/// Revocation records.
pub const REVOCATIONS: Table<RevocationRecord> = Table::new(0x05, "revocations");
/// Presentations.
pub const PRESENTATIONS: Table<VerifiablePresentation> = Table::new(0x06, "presentations");
/// Module parameters.
pub const PARAMS: Item<Params> = Item::new(0x07, "params");
/// Sequence number the next credential will get.
pub const CREDENTIAL_SEQUENCE: Item<u64> = Item::new(0x08, "credential_sequence");
/// Number of presentations created.
pub const PRESENTATION_COUNT: Item<u64> = Item::new(0x09, "presentation_count");

/// Primary key of a credential.
pub fn credential_key(id: &CredentialId) -> Vec<u8> {
    CREDENTIALS.key().str(id.as_str()).finish()
}

/// Key of a credential's revocation record.
pub fn revocation_key(id: &CredentialId) -> Vec<u8> {
    REVOCATIONS.key().str(id.as_str()).finish()
}

/// Primary key of a presentation.
pub fn presentation_key(id: &PresentationId) -> Vec<u8> {
    PRESENTATIONS.key().str(id.as_str()).finish()
}

/// Stored params, or the defaults if genesis set none.
pub fn load_params<S: KvStore + ?Sized>(store: &S) -> Result<Params, StoreError> {
    PARAMS.load_or_default(store)
}

/// Load a credential.
pub fn load_credential<S: KvStore + ?Sized>(
    store: &S,
    id: &CredentialId,
) -> Result<Option<VerifiableCredential>, StoreError> {
    CREDENTIALS.get(store, &credential_key(id))
}
