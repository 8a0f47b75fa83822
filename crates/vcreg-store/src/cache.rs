//! # Write-Set Overlay
//!
//! `CacheStore` buffers every write of one operation on top of a parent
//! store. Reads see the buffered writes first. Nothing reaches the parent
//! until [`CacheStore::commit()`]; dropping the cache without committing
//! discards the whole write-set.

use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::kv::{KvPair, KvStore};

/// A buffered write-set over a parent store.
pub struct CacheStore<'a, S: KvStore + ?Sized> {
    parent: &'a mut S,
    /// `None` marks a pending delete.
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: KvStore + ?Sized> CacheStore<'a, S> {
    /// Start an empty write-set over `parent`.
    pub fn new(parent: &'a mut S) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Number of buffered writes and deletes.
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    /// Flush the write-set into the parent, in key order.
    pub fn commit(self) -> Result<(), StoreError> {
        let count = self.writes.len();
        for (key, value) in self.writes {
            match value {
                Some(v) => self.parent.set(key, v)?,
                None => self.parent.delete(&key)?,
            }
        }
        tracing::trace!(writes = count, "write-set committed");
        Ok(())
    }

    /// Drop the write-set explicitly.
    pub fn discard(self) {
        tracing::trace!(writes = self.writes.len(), "write-set discarded");
    }
}

impl<S: KvStore + ?Sized> KvStore for CacheStore<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.writes.get(key) {
            Some(buffered) => Ok(buffered.clone()),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError> {
        self.writes.insert(key, Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<KvPair>, StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.prefix_scan(prefix)?.into_iter().collect();
        for (key, value) in self
            .writes
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}
