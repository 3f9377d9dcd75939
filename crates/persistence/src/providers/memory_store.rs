// Copyright (C) 2021-2025 EpicChain Labs.
//
// memory_store.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use super::memory_snapshot::MemorySnapshot;
use crate::error::StorageResult;
use crate::seek_direction::SeekDirection;
use crate::traits::{ReadOnlyStore, SeekIter, Store, StoreSnapshot, WriteStore};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

pub(crate) type MemoryMap = BTreeMap<Vec<u8>, Vec<u8>>;

/// Shared handle to the live map. Readers clone the inner `Arc` to pin a
/// version; writers go through `Arc::make_mut`, so a pinned version is never
/// mutated.
pub(crate) type SharedMap = Arc<RwLock<Arc<MemoryMap>>>;

/// An in-memory store backed by a `BTreeMap`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner_data: SharedMap,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the store, clearing all data.
    pub fn reset(&self) {
        *self.inner_data.write() = Arc::new(MemoryMap::new());
    }

    /// Opens a snapshot of the current contents.
    pub fn snapshot(&self) -> MemorySnapshot {
        let immutable = self.inner_data.read().clone();
        MemorySnapshot::new(self.inner_data.clone(), immutable)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner_data.read().len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner_data.read().is_empty()
    }
}

/// Scans one version of the map. Shared by the store and its snapshots.
pub(crate) fn seek_map(
    data: &MemoryMap,
    key_or_prefix: &[u8],
    direction: SeekDirection,
) -> SeekIter<'static> {
    let entries: Vec<(Vec<u8>, Vec<u8>)> = match direction {
        SeekDirection::Forward => data
            .range::<[u8], _>((Bound::Included(key_or_prefix), Bound::Unbounded))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        SeekDirection::Backward if key_or_prefix.is_empty() => Vec::new(),
        SeekDirection::Backward => data
            .range::<[u8], _>((Bound::Unbounded, Bound::Included(key_or_prefix)))
            .rev()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    };
    Box::new(entries.into_iter())
}

/// Applies a write batch to the live map under a single write lock.
pub(crate) fn apply_batch(target: &SharedMap, batch: BTreeMap<Vec<u8>, Option<Vec<u8>>>) {
    if batch.is_empty() {
        return;
    }
    let mut guard = target.write();
    let data = Arc::make_mut(&mut *guard);
    for (key, value) in batch {
        match value {
            Some(value) => {
                data.insert(key, value);
            }
            None => {
                data.remove(&key);
            }
        }
    }
}

impl ReadOnlyStore for MemoryStore {
    fn try_get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.inner_data.read().get(key).cloned())
    }

    fn contains(&self, key: &[u8]) -> StorageResult<bool> {
        Ok(self.inner_data.read().contains_key(key))
    }

    fn seek(&self, key_or_prefix: &[u8], direction: SeekDirection) -> StorageResult<SeekIter<'_>> {
        let data = self.inner_data.read().clone();
        Ok(seek_map(&data, key_or_prefix, direction))
    }
}

impl WriteStore for MemoryStore {
    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        let mut guard = self.inner_data.write();
        Arc::make_mut(&mut *guard).insert(key, value);
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StorageResult<()> {
        let mut guard = self.inner_data.write();
        if guard.contains_key(key) {
            Arc::make_mut(&mut *guard).remove(key);
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn get_snapshot(&self) -> Arc<dyn StoreSnapshot> {
        let snapshot = self.snapshot();
        tracing::trace!(target: "epicchain", entries = snapshot.len(), "memory snapshot opened");
        Arc::new(snapshot)
    }
}
