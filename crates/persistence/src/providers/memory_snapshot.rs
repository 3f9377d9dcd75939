// Copyright (C) 2021-2025 EpicChain Labs.
//
// memory_snapshot.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use super::memory_store::{apply_batch, seek_map, MemoryMap, SharedMap};
use crate::error::StorageResult;
use crate::seek_direction::SeekDirection;
use crate::traits::{ReadOnlyStore, SeekIter, StoreSnapshot, WriteStore};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A snapshot of a [`MemoryStore`](super::MemoryStore).
///
/// Reads go to the version of the map pinned at open time. Writes are buffered
/// (`None` marks a delete) until [`commit`](StoreSnapshot::commit) applies them
/// to the live store. The pinned version is not refreshed by a commit, so a
/// committed snapshot should be dropped and a new one opened.
pub struct MemorySnapshot {
    inner_data: SharedMap,
    immutable_data: Arc<MemoryMap>,
    write_batch: Mutex<BTreeMap<Vec<u8>, Option<Vec<u8>>>>,
}

impl MemorySnapshot {
    pub(crate) fn new(inner_data: SharedMap, immutable_data: Arc<MemoryMap>) -> Self {
        Self {
            inner_data,
            immutable_data,
            write_batch: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of entries in the pinned view.
    pub fn len(&self) -> usize {
        self.immutable_data.len()
    }

    /// Returns true if the pinned view holds no entries.
    pub fn is_empty(&self) -> bool {
        self.immutable_data.is_empty()
    }

    /// Number of writes waiting for commit.
    pub fn pending_writes(&self) -> usize {
        self.write_batch.lock().len()
    }
}

impl ReadOnlyStore for MemorySnapshot {
    fn try_get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.immutable_data.get(key).cloned())
    }

    fn contains(&self, key: &[u8]) -> StorageResult<bool> {
        Ok(self.immutable_data.contains_key(key))
    }

    fn seek(&self, key_or_prefix: &[u8], direction: SeekDirection) -> StorageResult<SeekIter<'_>> {
        Ok(seek_map(&self.immutable_data, key_or_prefix, direction))
    }
}

impl WriteStore for MemorySnapshot {
    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        self.write_batch.lock().insert(key, Some(value));
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.write_batch.lock().insert(key.to_vec(), None);
        Ok(())
    }
}

impl StoreSnapshot for MemorySnapshot {
    fn commit(&self) -> StorageResult<()> {
        let batch = std::mem::take(&mut *self.write_batch.lock());
        tracing::debug!(target: "epicchain", writes = batch.len(), "memory snapshot commit");
        apply_batch(&self.inner_data, batch);
        Ok(())
    }
}
