//! # vcreg-core — Foundational Types for the Credential Registry
//!
//! Leaf crate of the workspace. Everything the registry writes to the
//! replicated store, and everything it hashes into an identifier, passes
//! through the types defined here.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identifiers.** `Did`, `CredentialId`, `PresentationId` are
//!    validated at construction. A credential id cannot be passed where a
//!    holder DID is expected.
//!
//! 2. **`CanonicalBytes`.** Record encoding and digest input share one
//!    construction path (RFC 8785 JCS, floats rejected), so two replicas
//!    applying the same operation write the same bytes.
//!
//! 3. **Host-supplied time only.** `Timestamp` has no `now()`. The only clock
//!    the registry sees is the block time handed in by the host runtime.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vcreg-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, CoreError};
pub use identity::{CredentialId, Did, PresentationId, MAX_ID_LEN};
pub use temporal::Timestamp;
