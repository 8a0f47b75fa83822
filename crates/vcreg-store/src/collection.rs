//! # Typed Collections
//!
//! `Table<V>` is a keyed collection under one prefix byte; `Item<V>` is a
//! singleton stored at a one-byte key. Values are written as
//! `CanonicalBytes`, so the stored bytes depend only on the record's
//! content and never on field order or map iteration order.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use vcreg_core::CanonicalBytes;

use crate::error::StoreError;
use crate::key::KeyEncoder;
use crate::kv::KvStore;

/// Encode a value for storage.
pub fn encode<V: Serialize>(table: &'static str, value: &V) -> Result<Vec<u8>, StoreError> {
    CanonicalBytes::new(value)
        .map(CanonicalBytes::into_vec)
        .map_err(|source| StoreError::Encode { table, source })
}

/// Decode a stored value.
pub fn decode<V: DeserializeOwned>(table: &'static str, bytes: &[u8]) -> Result<V, StoreError> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::Decode { table, source })
}

/// A keyed collection of `V` under a single prefix byte.
#[derive(Debug)]
pub struct Table<V> {
    prefix: u8,
    name: &'static str,
    _value: PhantomData<fn() -> V>,
}

impl<V> Clone for Table<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Table<V> {}

impl<V: Serialize + DeserializeOwned> Table<V> {
    /// Declare a table.
    pub const fn new(prefix: u8, name: &'static str) -> Self {
        Self {
            prefix,
            name,
            _value: PhantomData,
        }
    }

    /// The table's prefix byte.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// The table's name, used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Start a key inside this table.
    pub fn key(&self) -> KeyEncoder {
        KeyEncoder::new(self.prefix)
    }

    /// Read and decode one record.
    pub fn get<S: KvStore + ?Sized>(&self, store: &S, key: &[u8]) -> Result<Option<V>, StoreError> {
        store
            .get(key)?
            .map(|bytes| decode(self.name, &bytes))
            .transpose()
    }

    /// Whether a record exists at `key`.
    pub fn has<S: KvStore + ?Sized>(&self, store: &S, key: &[u8]) -> Result<bool, StoreError> {
        store.has(key)
    }

    /// Encode and write one record.
    pub fn set<S: KvStore + ?Sized>(
        &self,
        store: &mut S,
        key: Vec<u8>,
        value: &V,
    ) -> Result<(), StoreError> {
        let bytes = encode(self.name, value)?;
        store.set(key, bytes)
    }

    /// Every record in the table, in key order.
    pub fn entries<S: KvStore + ?Sized>(&self, store: &S) -> Result<Vec<(Vec<u8>, V)>, StoreError> {
        self.scan(store, &[self.prefix])
    }

    /// Records whose full key starts with `prefix` (which must itself
    /// begin with this table's prefix byte), in key order.
    pub fn scan<S: KvStore + ?Sized>(
        &self,
        store: &S,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, V)>, StoreError> {
        store
            .prefix_scan(prefix)?
            .into_iter()
            .map(|(k, bytes)| Ok((k, decode(self.name, &bytes)?)))
            .collect()
    }
}

/// A singleton value at a one-byte key.
#[derive(Debug)]
pub struct Item<V> {
    key: u8,
    name: &'static str,
    _value: PhantomData<fn() -> V>,
}

impl<V> Clone for Item<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Item<V> {}

impl<V: Serialize + DeserializeOwned> Item<V> {
    /// Declare an item.
    pub const fn new(key: u8, name: &'static str) -> Self {
        Self {
            key,
            name,
            _value: PhantomData,
        }
    }

    /// Read the value if it has been set.
    pub fn may_load<S: KvStore + ?Sized>(&self, store: &S) -> Result<Option<V>, StoreError> {
        store
            .get(&[self.key])?
            .map(|bytes| decode(self.name, &bytes))
            .transpose()
    }

    /// Write the value.
    pub fn save<S: KvStore + ?Sized>(&self, store: &mut S, value: &V) -> Result<(), StoreError> {
        let bytes = encode(self.name, value)?;
        store.set(vec![self.key], bytes)
    }
}

impl<V: Serialize + DeserializeOwned + Default> Item<V> {
    /// Read the value, falling back to `V::default()` when unset.
    pub fn load_or_default<S: KvStore + ?Sized>(&self, store: &S) -> Result<V, StoreError> {
        Ok(self.may_load(store)?.unwrap_or_default())
    }
}
