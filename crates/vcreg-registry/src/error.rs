//! # Registry Errors
//!
//! Every failure the registry can return, each carrying the id or field
//! that caused it. [`RegistryError::kind()`] folds the variants into the
//! coarse taxonomy callers branch on.

use std::fmt;

use thiserror::Error;

use vcreg_core::{CredentialId, PresentationId, Timestamp};
use vcreg_store::StoreError;

use crate::fee::FeeError;

/// Coarse classification of a [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input, oversized payload.
    Validation,
    /// Referenced record does not exist.
    NotFound,
    /// Duplicate id or repeated revocation.
    Conflict,
    /// Caller may not perform the operation.
    Unauthorized,
    /// Fee debit failed.
    InsufficientResources,
    /// Referenced credential is revoked or expired.
    Temporal,
    /// An index entry points at a missing record. Never a user error.
    Consistency,
    /// Store backend or codec failure.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validation => "validation",
            Self::NotFound => "not-found",
            Self::Conflict => "conflict",
            Self::Unauthorized => "unauthorized",
            Self::InsufficientResources => "insufficient-resources",
            Self::Temporal => "temporal",
            Self::Consistency => "consistency",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Errors returned by registry operations and queries.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A credential field is malformed or missing.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// The issuer is not a well-formed account identifier.
    #[error("invalid issuer {issuer:?}: {reason}")]
    InvalidIssuer {
        /// The rejected issuer string.
        issuer: String,
        /// Why the resolver rejected it.
        reason: String,
    },

    /// Some other account-valued field failed to resolve.
    #[error("invalid {field} {value:?}: {reason}")]
    InvalidAccount {
        /// Which message field.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Why the resolver rejected it.
        reason: String,
    },

    /// The encoded credential exceeds `max_credential_size`.
    #[error("credential payload is {size} bytes, limit is {max}")]
    PayloadTooLarge {
        /// Canonical encoded size.
        size: u64,
        /// Configured maximum.
        max: u64,
    },

    /// The encoded presentation exceeds `max_credential_size`.
    #[error("presentation payload is {size} bytes, limit is {max}")]
    PresentationTooLarge {
        /// Canonical encoded size.
        size: u64,
        /// Configured maximum.
        max: u64,
    },

    /// A presentation request is malformed.
    #[error("invalid presentation: {0}")]
    InvalidPresentation(String),

    /// Module parameters are out of range.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// A genesis document failed validation.
    #[error("invalid genesis: {0}")]
    InvalidGenesis(String),

    /// A credential with this id already exists.
    #[error("credential {0} already exists")]
    CredentialAlreadyExists(CredentialId),

    /// A presentation with this id already exists.
    #[error("presentation {0} already exists")]
    PresentationAlreadyExists(PresentationId),

    /// Revocation was requested for a credential that is already revoked.
    #[error("credential {0} is already revoked")]
    AlreadyRevoked(CredentialId),

    /// No credential with this id.
    #[error("credential {0} not found")]
    CredentialNotFound(CredentialId),

    /// No presentation with this id.
    #[error("presentation {0} not found")]
    PresentationNotFound(PresentationId),

    /// The credential has never been revoked.
    #[error("no revocation record for credential {0}")]
    RevocationNotFound(CredentialId),

    /// The revoker is neither the issuer nor the subject.
    #[error("{revoker} may not revoke credential {credential_id}: {reason}")]
    Unauthorized {
        /// Credential the revocation targeted.
        credential_id: CredentialId,
        /// Who asked.
        revoker: String,
        /// Why the capability check failed.
        reason: String,
    },

    /// The payer cannot cover the fee.
    #[error("insufficient funds: {payer} needs {required}{denom}, has {available}{denom}")]
    InsufficientFunds {
        /// Account that was charged.
        payer: String,
        /// Fee denomination.
        denom: String,
        /// Fee amount.
        required: u64,
        /// Balance at the time of the charge.
        available: u64,
    },

    /// A presentation referenced a revoked credential.
    #[error("credential {0} is revoked")]
    CredentialRevoked(CredentialId),

    /// A presentation referenced an expired credential.
    #[error("credential {id} expired at {expired_at}")]
    CredentialExpired {
        /// The expired credential.
        id: CredentialId,
        /// Its expiration date.
        expired_at: Timestamp,
    },

    /// An index entry has no primary record behind it.
    #[error("{index} index entry for {field:?} points to missing credential {credential_id}")]
    IndexInconsistent {
        /// Index name.
        index: &'static str,
        /// Indexed field value.
        field: String,
        /// Dangling credential id.
        credential_id: String,
    },

    /// Fee collection failed for a reason other than the balance.
    #[error("fee collection failed: {0}")]
    Fee(String),

    /// Store backend or codec failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCredential(_)
            | Self::InvalidIssuer { .. }
            | Self::InvalidAccount { .. }
            | Self::PayloadTooLarge { .. }
            | Self::PresentationTooLarge { .. }
            | Self::InvalidPresentation(_)
            | Self::InvalidParams(_)
            | Self::InvalidGenesis(_) => ErrorKind::Validation,
            Self::CredentialAlreadyExists(_)
            | Self::PresentationAlreadyExists(_)
            | Self::AlreadyRevoked(_) => ErrorKind::Conflict,
            Self::CredentialNotFound(_)
            | Self::PresentationNotFound(_)
            | Self::RevocationNotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientResources,
            Self::CredentialRevoked(_) | Self::CredentialExpired { .. } => ErrorKind::Temporal,
            Self::IndexInconsistent { .. } => ErrorKind::Consistency,
            Self::Fee(_) | Self::Store(_) => ErrorKind::Internal,
        }
    }
}

impl From<FeeError> for RegistryError {
    fn from(err: FeeError) -> Self {
        match err {
            FeeError::InsufficientFunds {
                payer,
                denom,
                required,
                available,
            } => Self::InsufficientFunds {
                payer,
                denom,
                required,
                available,
            },
            FeeError::Store(e) => Self::Store(e),
            other => Self::Fee(other.to_string()),
        }
    }
}
