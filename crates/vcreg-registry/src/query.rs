//! Read-only queries. None of these write to the store.

use vcreg_core::{CredentialId, PresentationId};
use vcreg_store::KvStore;

use crate::credential::VerifiableCredential;
use crate::error::RegistryError;
use crate::index::{scan_credentials, IndexKind};
use crate::params::Params;
use crate::presentation::VerifiablePresentation;
use crate::revocation::RevocationRecord;
use crate::state::{
    load_credential, load_params, presentation_key, revocation_key, CREDENTIALS, PRESENTATIONS,
    PRESENTATION_COUNT, REVOCATIONS,
};

/// Look up a credential.
pub fn credential<S: KvStore + ?Sized>(
    store: &S,
    id: &CredentialId,
) -> Result<VerifiableCredential, RegistryError> {
    load_credential(store, id)?.ok_or_else(|| RegistryError::CredentialNotFound(id.clone()))
}

/// Look up a presentation.
pub fn presentation<S: KvStore + ?Sized>(
    store: &S,
    id: &PresentationId,
) -> Result<VerifiablePresentation, RegistryError> {
    PRESENTATIONS
        .get(store, &presentation_key(id))?
        .ok_or_else(|| RegistryError::PresentationNotFound(id.clone()))
}

/// Look up the revocation record of a credential.
pub fn revocation<S: KvStore + ?Sized>(
    store: &S,
    id: &CredentialId,
) -> Result<RevocationRecord, RegistryError> {
    REVOCATIONS
        .get(store, &revocation_key(id))?
        .ok_or_else(|| RegistryError::RevocationNotFound(id.clone()))
}

/// Credentials issued by `issuer`, in creation order.
pub fn credentials_by_issuer<S: KvStore + ?Sized>(
    store: &S,
    issuer: &str,
) -> Result<Vec<VerifiableCredential>, RegistryError> {
    scan_credentials(store, IndexKind::Issuer, issuer)
}

/// Credentials whose subject is `holder`, in creation order.
pub fn credentials_by_holder<S: KvStore + ?Sized>(
    store: &S,
    holder: &str,
) -> Result<Vec<VerifiableCredential>, RegistryError> {
    scan_credentials(store, IndexKind::Holder, holder)
}

/// Credentials carrying type tag `credential_type`, in creation order.
pub fn credentials_by_type<S: KvStore + ?Sized>(
    store: &S,
    credential_type: &str,
) -> Result<Vec<VerifiableCredential>, RegistryError> {
    scan_credentials(store, IndexKind::Type, credential_type)
}

/// Current parameters.
pub fn params<S: KvStore + ?Sized>(store: &S) -> Result<Params, RegistryError> {
    Ok(load_params(store)?)
}

/// Number of presentations created.
pub fn presentation_count<S: KvStore + ?Sized>(store: &S) -> Result<u64, RegistryError> {
    Ok(PRESENTATION_COUNT.load_or_default(store)?)
}

/// Number of credentials stored, revoked ones included.
pub fn credential_count<S: KvStore + ?Sized>(store: &S) -> Result<u64, RegistryError> {
    Ok(store.prefix_scan(&[CREDENTIALS.prefix()])?.len() as u64)
}
