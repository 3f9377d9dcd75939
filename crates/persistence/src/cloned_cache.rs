// Copyright (C) 2021-2025 EpicChain Labs.
//
// cloned_cache.rs file belongs to the epicchain project and is free
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

/// A cache layered over another cache.
///
/// Its changes reach the inner cache only when it is committed; dropping it
/// uncommitted leaves the inner cache untouched.
pub type ClonedCache<'a, B> = DataCache<ClonedStore<'a, B>>;

/// [`CacheBackend`] that delegates to an inner [`DataCache`].
///
/// Items cross the boundary as copies, so the two caches never share an item.
pub struct ClonedStore<'a, B: CacheBackend> {
    inner: &'a DataCache<B>,
}

impl<'a, B: CacheBackend> ClonedStore<'a, B> {
    /// Wraps `inner`.
    pub fn new(inner: &'a DataCache<B>) -> Self {
        Self { inner }
    }

    /// The cache this one commits into.
    pub fn inner(&self) -> &'a DataCache<B> {
        self.inner
    }
}

impl<'a, B: CacheBackend> DataCache<ClonedStore<'a, B>> {
    /// Creates a cache layered over `inner`.
    pub fn new(inner: &'a DataCache<B>) -> Self {
        Self::with_backend(ClonedStore::new(inner))
    }
}

impl<B: CacheBackend> DataCache<B> {
    /// Creates a disposable cache layered over this one.
    pub fn create_snapshot(&self) -> ClonedCache<'_, B> {
        DataCache::with_backend(ClonedStore::new(self))
    }
}

impl<B: CacheBackend> CacheBackend for ClonedStore<'_, B> {
    fn add_internal(&self, key: &StorageKey, item: &StorageItem) -> StorageResult<()> {
        self.inner.add(key.clone(), item.clone())
    }

    fn delete_internal(&self, key: &StorageKey) -> StorageResult<()> {
        self.inner.delete(key)
    }

    fn contains_internal(&self, key: &StorageKey) -> StorageResult<bool> {
        self.inner.contains(key)
    }

    fn get_internal(&self, key: &StorageKey) -> StorageResult<StorageItem> {
        self.inner.get(key)
    }

    fn try_get_internal(&self, key: &StorageKey) -> StorageResult<Option<StorageItem>> {
        self.inner.try_get(key)
    }

    fn update_internal(&self, key: &StorageKey, item: &StorageItem) -> StorageResult<()> {
        let mut target = self
            .inner
            .get_and_change(key)?
            .ok_or_else(|| StorageError::key_not_found(key.to_array()))?;
        target.from_replica(item);
        Ok(())
    }

    fn seek_internal(
        &self,
        key_or_prefix: &[u8],
        direction: SeekDirection,
    ) -> StorageResult<SeekResult<'_>> {
        self.inner.seek(key_or_prefix, direction)
    }
}

#[cfg(test)]
mod tests {
    use crate::providers::MemoryStore;
    use crate::{SnapshotCache, StorageItem, StorageKey};
    use std::sync::Arc;

    fn key(suffix: u8) -> StorageKey {
        StorageKey::new(-1, vec![suffix])
    }

    #[test]
    fn test_clone_reads_parent() {
        let store = MemoryStore::new();
        let parent = SnapshotCache::new(Arc::new(store.snapshot()));
        parent.add(key(0x01), StorageItem::new(vec![0x01])).unwrap();

        let clone = parent.create_snapshot();
        assert_eq!(clone.try_get(&key(0x01)).unwrap().unwrap().value(), &[0x01]);
        assert!(clone.contains(&key(0x01)).unwrap());
        assert!(!clone.contains(&key(0x02)).unwrap());
    }

    #[test]
    fn test_clone_changes_stay_local_until_commit() {
        let store = MemoryStore::new();
        let parent = SnapshotCache::new(Arc::new(store.snapshot()));
        parent.add(key(0x01), StorageItem::new(vec![0x01])).unwrap();

        let clone = parent.create_snapshot();
        clone.add(key(0x02), StorageItem::new(vec![0x02])).unwrap();
        clone
            .get_and_change(&key(0x01))
            .unwrap()
            .unwrap()
            .set_value(vec![0x11]);

        assert_eq!(parent.try_get(&key(0x02)).unwrap(), None);
        assert_eq!(parent.get(&key(0x01)).unwrap().value(), &[0x01]);

        clone.commit().unwrap();
        assert_eq!(parent.get(&key(0x01)).unwrap().value(), &[0x11]);
        assert_eq!(parent.get(&key(0x02)).unwrap().value(), &[0x02]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clone_of_clone() {
        let store = MemoryStore::new();
        let root = SnapshotCache::new(Arc::new(store.snapshot()));
        let middle = root.create_snapshot();
        let leaf = middle.create_snapshot();

        leaf.add(key(0x03), StorageItem::new(vec![0x03])).unwrap();
        leaf.commit().unwrap();
        assert!(middle.contains(&key(0x03)).unwrap());
        assert!(!root.contains(&key(0x03)).unwrap());

        middle.commit().unwrap();
        assert!(root.contains(&key(0x03)).unwrap());
    }
}
