//! # vcreg-store — State Store Boundary
//!
//! The host runtime owns an ordered, versioned key-value store. This crate
//! defines the minimal surface the registry consumes from it and the
//! plumbing layered on top:
//!
//! - **`KvStore`** (`kv.rs`): get / set / delete / prefix scan.
//!   [`MemoryStore`] is a `BTreeMap` implementation used by tests and the
//!   CLI replay tool.
//!
//! - **`CacheStore`** (`cache.rs`): a write-set buffered over a parent
//!   store. One operation runs against a `CacheStore`; its writes reach
//!   the parent only through [`CacheStore::commit()`]. Dropping it discards
//!   everything, which is how a failed operation leaves no partial state.
//!
//! - **Composite keys** (`key.rs`): length-prefixed segments so that a
//!   field value can never bleed into the next segment, whatever bytes it
//!   contains.
//!
//! - **Collections** (`collection.rs`): `Table<V>` and `Item<V>`, typed
//!   views over one key prefix whose values are encoded through
//!   `CanonicalBytes`.

pub mod cache;
pub mod collection;
pub mod error;
pub mod key;
pub mod kv;

pub use cache::CacheStore;
pub use collection::{Item, Table};
pub use error::StoreError;
pub use key::{KeyDecoder, KeyEncoder};
pub use kv::{KvPair, KvStore, MemoryStore};
