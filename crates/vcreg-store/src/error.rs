//! # Store Errors

use thiserror::Error;

/// Errors crossing the store boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The host backend failed.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A value could not be encoded canonically.
    #[error("failed to encode {table} value: {source}")]
    Encode {
        /// Collection name.
        table: &'static str,
        /// Underlying canonicalization failure.
        #[source]
        source: vcreg_core::CanonicalizationError,
    },

    /// Stored bytes did not decode into the expected record type.
    #[error("failed to decode {table} value: {source}")]
    Decode {
        /// Collection name.
        table: &'static str,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// A stored key did not match the expected composite layout.
    #[error("malformed key: {0}")]
    MalformedKey(String),
}
