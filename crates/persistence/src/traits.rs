// Copyright (C) 2021-2025 EpicChain Labs.
//
// traits.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Contracts of the physical key-value stores sitting under the caches.

use crate::error::StorageResult;
use crate::seek_direction::SeekDirection;
use std::sync::Arc;

/// Ordered sequence of raw key/value pairs produced by a store scan.
pub type SeekIter<'a> = Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>;

/// Read access to a raw byte store.
pub trait ReadOnlyStore: Send + Sync {
    /// Reads a value. Returns `None` when the key is absent.
    fn try_get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Determines whether the store contains the specified key.
    fn contains(&self, key: &[u8]) -> StorageResult<bool> {
        Ok(self.try_get(key)?.is_some())
    }

    /// Scans the store starting at `key_or_prefix`.
    ///
    /// Forward scans yield keys `>= key_or_prefix` in ascending order, backward
    /// scans yield keys `<= key_or_prefix` in descending order. An empty key
    /// scanned backward yields nothing. Every pair is an owned copy.
    fn seek(&self, key_or_prefix: &[u8], direction: SeekDirection) -> StorageResult<SeekIter<'_>>;
}

/// Write access to a raw byte store.
pub trait WriteStore: Send + Sync {
    /// Puts a value. Existing values are overwritten.
    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()>;

    /// Deletes a value. Deleting an absent key is not an error.
    fn delete(&self, key: &[u8]) -> StorageResult<()>;
}

/// A point-in-time view of a store with a private write buffer.
///
/// Reads never observe writes made to the store after the snapshot was taken,
/// nor the snapshot's own buffered writes.
pub trait StoreSnapshot: ReadOnlyStore + WriteStore {
    /// Applies the buffered writes to the store.
    fn commit(&self) -> StorageResult<()>;
}

/// A live, directly writable store.
pub trait Store: ReadOnlyStore + WriteStore {
    /// Opens a new snapshot of the current contents.
    fn get_snapshot(&self) -> Arc<dyn StoreSnapshot>;
}

/// A provider used to open stores.
pub trait StoreProvider: Send + Sync {
    /// The name the provider is registered under.
    fn name(&self) -> &str;

    /// Opens or creates the store at `path`.
    fn get_store(&self, path: &str) -> StorageResult<Arc<dyn Store>>;
}
