// Copyright (C) 2021-2025 EpicChain Labs.
//
// snapshot_cache.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::data_cache::{CacheBackend, DataCache, SeekResult};
use crate::error::{StorageError, StorageResult};
use crate::seek_direction::SeekDirection;
use crate::storage_item::StorageItem;
use crate::storage_key::StorageKey;
use crate::traits::{ReadOnlyStore, Store, StoreSnapshot, WriteStore};
use std::sync::Arc;

/// A cache bound to a physical snapshot or store.
pub type SnapshotCache = DataCache<SnapshotStore>;

enum Source {
    Snapshot(Arc<dyn StoreSnapshot>),
    Store(Arc<dyn Store>),
    ReadOnly(Arc<dyn ReadOnlyStore>),
}

// Runs the same read against whichever store the source holds.
macro_rules! read_source {
    ($source:expr, $store:ident => $read:expr) => {
        match $source {
            Source::Snapshot($store) => $read,
            Source::Store($store) => $read,
            Source::ReadOnly($store) => $read,
        }
    };
}

/// [`CacheBackend`] over a physical store.
///
/// Reads go to the attached store or snapshot. Writes are only forwarded when
/// a snapshot is attached; over a plain store they are discarded.
pub struct SnapshotStore {
    source: Source,
}

impl SnapshotStore {
    /// Binds to a snapshot. Commits flush its write buffer.
    pub fn new(snapshot: Arc<dyn StoreSnapshot>) -> Self {
        Self {
            source: Source::Snapshot(snapshot),
        }
    }

    /// Binds to a store for reading only.
    pub fn from_store(store: Arc<dyn Store>) -> Self {
        Self {
            source: Source::Store(store),
        }
    }

    /// Binds to any readable store.
    pub fn from_read_only(store: Arc<dyn ReadOnlyStore>) -> Self {
        Self {
            source: Source::ReadOnly(store),
        }
    }

    fn snapshot(&self) -> Option<&Arc<dyn StoreSnapshot>> {
        match &self.source {
            Source::Snapshot(snapshot) => Some(snapshot),
            Source::Store(_) | Source::ReadOnly(_) => None,
        }
    }
}

impl DataCache<SnapshotStore> {
    /// Creates a cache that commits into `snapshot`.
    pub fn new(snapshot: Arc<dyn StoreSnapshot>) -> Self {
        Self::with_backend(SnapshotStore::new(snapshot))
    }

    /// Creates a read-only view of a live store.
    pub fn from_store(store: Arc<dyn Store>) -> Self {
        Self::with_backend(SnapshotStore::from_store(store))
    }

    /// Creates a read-only view of any readable store.
    pub fn from_read_only(store: Arc<dyn ReadOnlyStore>) -> Self {
        Self::with_backend(SnapshotStore::from_read_only(store))
    }
}

impl CacheBackend for SnapshotStore {
    fn add_internal(&self, key: &StorageKey, item: &StorageItem) -> StorageResult<()> {
        match self.snapshot() {
            Some(snapshot) => snapshot.put(key.to_array(), item.value().to_vec()),
            None => Ok(()),
        }
    }

    fn delete_internal(&self, key: &StorageKey) -> StorageResult<()> {
        match self.snapshot() {
            Some(snapshot) => snapshot.delete(&key.to_array()),
            None => Ok(()),
        }
    }

    fn contains_internal(&self, key: &StorageKey) -> StorageResult<bool> {
        let raw = key.to_array();
        read_source!(&self.source, store => store.contains(&raw))
    }

    fn get_internal(&self, key: &StorageKey) -> StorageResult<StorageItem> {
        self.try_get_internal(key)?
            .ok_or_else(|| StorageError::key_not_found(key.to_array()))
    }

    fn try_get_internal(&self, key: &StorageKey) -> StorageResult<Option<StorageItem>> {
        let raw = key.to_array();
        let value = read_source!(&self.source, store => store.try_get(&raw))?;
        Ok(value.map(StorageItem::new))
    }

    fn update_internal(&self, key: &StorageKey, item: &StorageItem) -> StorageResult<()> {
        self.add_internal(key, item)
    }

    fn seek_internal(
        &self,
        key_or_prefix: &[u8],
        direction: SeekDirection,
    ) -> StorageResult<SeekResult<'_>> {
        let entries = read_source!(&self.source, store => store.seek(key_or_prefix, direction))?;
        Ok(Box::new(entries.filter_map(|(raw, value)| {
            match StorageKey::try_from_array(&raw) {
                Ok(key) => Some((key, StorageItem::new(value))),
                Err(err) => {
                    tracing::warn!(
                        target: "epicchain",
                        key = %hex::encode(&raw),
                        error = %err,
                        "skipping undecodable store key"
                    );
                    None
                }
            }
        })))
    }

    fn commit_internal(&self) -> StorageResult<()> {
        if let Some(snapshot) = self.snapshot() {
            snapshot.commit()?;
        }
        Ok(())
    }

    fn is_read_only(&self) -> bool {
        self.snapshot().is_none()
    }
}
