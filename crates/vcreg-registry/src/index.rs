//! # Secondary Indexes
//!
//! Three derived indexes over the primary credential table: by issuer, by
//! holder (the subject id), and by type tag (one entry per tag).
//!
//! Entry key: `prefix | field | sequence | credential id`, with the field
//! and id length-prefixed and the sequence a big-endian `u64`. A prefix
//! scan over `prefix | field` therefore yields exactly that field's
//! credentials, in creation order, and no field value can be mistaken for
//! a prefix of another. The entry value is the credential id.
//!
//! Entries are only written by [`insert_indexes()`], which the credential
//! keeper and genesis import call in the same write-set as the primary
//! record. Nothing deletes them; revocation leaves them in place.

use std::fmt;

use vcreg_core::CredentialId;
use vcreg_store::{KeyEncoder, KvStore, StoreError, Table};

use crate::credential::VerifiableCredential;
use crate::error::RegistryError;
use crate::state::load_credential;

const ISSUER_INDEX: Table<CredentialId> = Table::new(0x02, "issuer_index");
const HOLDER_INDEX: Table<CredentialId> = Table::new(0x03, "holder_index");
const TYPE_INDEX: Table<CredentialId> = Table::new(0x04, "type_index");

/// Which secondary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// Keyed by issuer DID.
    Issuer,
    /// Keyed by subject id.
    Holder,
    /// Keyed by type tag.
    Type,
}

impl IndexKind {
    /// All indexes.
    pub const ALL: [IndexKind; 3] = [Self::Issuer, Self::Holder, Self::Type];

    fn table(self) -> Table<CredentialId> {
        match self {
            Self::Issuer => ISSUER_INDEX,
            Self::Holder => HOLDER_INDEX,
            Self::Type => TYPE_INDEX,
        }
    }

    /// Index name.
    pub fn name(self) -> &'static str {
        self.table().name()
    }

    /// The field values `credential` is indexed under.
    pub fn fields(self, credential: &VerifiableCredential) -> Vec<&str> {
        match self {
            Self::Issuer => vec![credential.issuer.as_str()],
            Self::Holder => vec![credential.credential_subject.id.as_str()],
            Self::Type => credential.credential_type.iter().map(String::as_str).collect(),
        }
    }

    fn field_prefix(self, field: &str) -> KeyEncoder {
        self.table().key().str(field)
    }

    fn entry_key(self, field: &str, sequence: u64, id: &CredentialId) -> Vec<u8> {
        self.field_prefix(field).u64(sequence).str(id.as_str()).finish()
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Write every index entry for `credential`.
pub fn insert_indexes<S: KvStore + ?Sized>(
    store: &mut S,
    credential: &VerifiableCredential,
) -> Result<(), StoreError> {
    let seq = credential.provenance.sequence;
    for kind in IndexKind::ALL {
        for field in kind.fields(credential) {
            kind.table()
                .set(store, kind.entry_key(field, seq, &credential.id), &credential.id)?;
        }
    }
    tracing::debug!(id = %credential.id, sequence = seq, "index entries written");
    Ok(())
}

/// Credential ids indexed under `field`, in creation order.
pub fn indexed_ids<S: KvStore + ?Sized>(
    store: &S,
    kind: IndexKind,
    field: &str,
) -> Result<Vec<CredentialId>, StoreError> {
    let table = kind.table();
    Ok(table
        .scan(store, &kind.field_prefix(field).finish())?
        .into_iter()
        .map(|(_, id)| id)
        .collect())
}

/// Credentials indexed under `field`, in creation order. A dangling entry
/// aborts the scan.
pub fn scan_credentials<S: KvStore + ?Sized>(
    store: &S,
    kind: IndexKind,
    field: &str,
) -> Result<Vec<VerifiableCredential>, RegistryError> {
    indexed_ids(store, kind, field)?
        .into_iter()
        .map(|id| -> Result<VerifiableCredential, RegistryError> {
            match load_credential(store, &id)? {
                Some(credential) => Ok(credential),
                None => {
                    tracing::error!(index = %kind, field, credential_id = %id, "dangling index entry");
                    Err(RegistryError::IndexInconsistent {
                        index: kind.name(),
                        field: field.to_string(),
                        credential_id: id.to_string(),
                    })
                }
            }
        })
        .collect()
}
