// Copyright (C) 2021-2025 EpicChain Labs.
//
// data_cache.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::error::{StorageError, StorageResult};
use crate::seek_direction::SeekDirection;
use crate::storage_item::StorageItem;
use crate::storage_key::StorageKey;
use crate::track_state::TrackState;
use epicchain_extensions::{ByteArrayComparer, ByteArrayEqualityComparer};
use indexmap::IndexSet;
use std::cell::{Ref, RefCell, RefMut};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::iter::Peekable;

/// Represents an entry in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trackable {
    /// The data of the entry.
    pub item: StorageItem,

    /// The state of the entry.
    pub state: TrackState,
}

impl Trackable {
    /// Creates a new Trackable.
    pub fn new(item: StorageItem, state: TrackState) -> Self {
        Self { item, state }
    }
}

/// Ordered sequence of typed entries produced by a scan.
pub type SeekResult<'a> = Box<dyn Iterator<Item = (StorageKey, StorageItem)> + 'a>;

/// The storage a [`DataCache`] reads from and replays its changes into.
///
/// Read hooks are called on cache misses. Write hooks are only called from
/// [`DataCache::commit`], once per pending entry.
pub trait CacheBackend {
    /// Adds a new entry to the backing storage.
    fn add_internal(&self, key: &StorageKey, item: &StorageItem) -> StorageResult<()>;

    /// Deletes an entry from the backing storage.
    fn delete_internal(&self, key: &StorageKey) -> StorageResult<()>;

    /// Determines whether the backing storage contains the key.
    fn contains_internal(&self, key: &StorageKey) -> StorageResult<bool>;

    /// Reads an entry that must exist. Fails with [`StorageError::KeyNotFound`]
    /// otherwise.
    fn get_internal(&self, key: &StorageKey) -> StorageResult<StorageItem>;

    /// Reads an entry that may be absent.
    fn try_get_internal(&self, key: &StorageKey) -> StorageResult<Option<StorageItem>>;

    /// Overwrites an existing entry in the backing storage.
    fn update_internal(&self, key: &StorageKey, item: &StorageItem) -> StorageResult<()>;

    /// Scans the backing storage from a raw key position.
    fn seek_internal(
        &self,
        key_or_prefix: &[u8],
        direction: SeekDirection,
    ) -> StorageResult<SeekResult<'_>>;

    /// Called after all pending entries were replayed.
    fn commit_internal(&self) -> StorageResult<()> {
        Ok(())
    }

    /// Returns true if the write hooks discard their input.
    fn is_read_only(&self) -> bool {
        false
    }
}

type Dictionary = HashMap<StorageKey, Trackable, ByteArrayEqualityComparer>;

/// Change-tracking cache over a [`CacheBackend`].
///
/// Reads are served from the tracked entries first and fall through to the
/// backend. Writes stay in memory until [`commit`](Self::commit). A cache is
/// meant for a single unit of work on one thread; parallel work layers its own
/// [`ClonedCache`](crate::ClonedCache) over a shared parent.
pub struct DataCache<B: CacheBackend> {
    backend: B,
    dictionary: RefCell<Dictionary>,
    change_set: RefCell<IndexSet<StorageKey, ByteArrayEqualityComparer>>,
}

impl<B: CacheBackend> DataCache<B> {
    /// Creates an empty cache over `backend`.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            dictionary: RefCell::new(HashMap::with_hasher(ByteArrayEqualityComparer::DEFAULT)),
            change_set: RefCell::new(IndexSet::with_hasher(ByteArrayEqualityComparer::DEFAULT)),
        }
    }

    /// The backing storage.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns true if committing cannot reach the backing storage.
    pub fn is_read_only(&self) -> bool {
        self.backend.is_read_only()
    }

    /// Reads an entry that must exist.
    ///
    /// Deleted entries and cached misses fail with
    /// [`StorageError::KeyNotFound`], as does a miss in the backend.
    pub fn get(&self, key: &StorageKey) -> StorageResult<StorageItem> {
        if let Some(trackable) = self.entries()?.get(key) {
            if trackable.state.is_live() {
                return Ok(trackable.item.clone());
            }
            return Err(StorageError::key_not_found(key.to_array()));
        }

        let item = self.backend.get_internal(key)?;
        self.track(key.clone(), item.clone(), TrackState::None)?;
        Ok(item)
    }

    /// Reads an entry that may be absent. A miss is remembered for the
    /// lifetime of the cache.
    pub fn try_get(&self, key: &StorageKey) -> StorageResult<Option<StorageItem>> {
        if let Some(trackable) = self.entries()?.get(key) {
            return Ok(trackable
                .state
                .is_live()
                .then(|| trackable.item.clone()));
        }

        match self.backend.try_get_internal(key)? {
            Some(item) => {
                self.track(key.clone(), item.clone(), TrackState::None)?;
                Ok(Some(item))
            }
            None => {
                tracing::trace!(target: "epicchain", %key, "cache miss");
                self.track(key.clone(), StorageItem::default(), TrackState::NotFound)?;
                Ok(None)
            }
        }
    }

    /// Determines whether the cache contains the key.
    pub fn contains(&self, key: &StorageKey) -> StorageResult<bool> {
        if let Some(trackable) = self.entries()?.get(key) {
            return Ok(trackable.state.is_live());
        }
        self.backend.contains_internal(key)
    }

    /// Adds a new entry.
    ///
    /// Fails with [`StorageError::DuplicateKey`] if the key is already live.
    /// Adding over a deleted entry turns it into an update.
    pub fn add(&self, key: StorageKey, item: StorageItem) -> StorageResult<()> {
        let state = match self.tracked_state(&key)? {
            Some(state) if state.is_live() => {
                return Err(StorageError::duplicate_key(key.to_array()));
            }
            Some(TrackState::Deleted) => TrackState::Changed,
            _ => TrackState::Added,
        };

        self.track(key.clone(), item, state)?;
        self.change_set.borrow_mut().insert(key);
        Ok(())
    }

    /// Deletes an entry.
    ///
    /// An entry added in this cache is simply forgotten. Deleting a key that
    /// exists nowhere does nothing.
    pub fn delete(&self, key: &StorageKey) -> StorageResult<()> {
        match self.tracked_state(key)? {
            Some(TrackState::Added) => {
                self.entries_mut()?.remove(key);
                self.change_set.borrow_mut().shift_remove(key);
            }
            Some(TrackState::None | TrackState::Changed) => {
                self.set_state(key, TrackState::Deleted)?;
                self.change_set.borrow_mut().insert(key.clone());
            }
            Some(TrackState::Deleted | TrackState::NotFound) => {}
            None => {
                if let Some(item) = self.backend.try_get_internal(key)? {
                    self.track(key.clone(), item, TrackState::Deleted)?;
                    self.change_set.borrow_mut().insert(key.clone());
                }
            }
        }
        Ok(())
    }

    /// Gets a mutable handle to an entry and marks it changed.
    ///
    /// Returns `None` if the entry does not exist. While the handle is alive
    /// every other operation on this cache fails with
    /// [`StorageError::InvalidOperation`]; drop it before the next call.
    pub fn get_and_change(
        &self,
        key: &StorageKey,
    ) -> StorageResult<Option<RefMut<'_, StorageItem>>> {
        if !self.prepare_change(key, None::<fn() -> StorageItem>)? {
            return Ok(None);
        }
        self.item_mut(key)
    }

    /// Gets a mutable handle to an entry, creating it with `factory` when it
    /// does not exist, and marks it changed.
    pub fn get_and_change_with<F>(
        &self,
        key: &StorageKey,
        factory: F,
    ) -> StorageResult<RefMut<'_, StorageItem>>
    where
        F: FnOnce() -> StorageItem,
    {
        self.prepare_change(key, Some(factory))?;
        self.item_mut(key)?
            .ok_or_else(|| StorageError::key_not_found(key.to_array()))
    }

    /// Reads an entry, adding the one built by `factory` when it does not
    /// exist.
    pub fn get_or_add<F>(&self, key: &StorageKey, factory: F) -> StorageResult<StorageItem>
    where
        F: FnOnce() -> StorageItem,
    {
        match self.tracked_state(key)? {
            Some(state) if state.is_live() => self.get(key),
            Some(state) => {
                let item = factory();
                let state = if state == TrackState::Deleted {
                    TrackState::Changed
                } else {
                    TrackState::Added
                };
                self.track(key.clone(), item.clone(), state)?;
                self.change_set.borrow_mut().insert(key.clone());
                Ok(item)
            }
            None => match self.backend.try_get_internal(key)? {
                Some(item) => {
                    self.track(key.clone(), item.clone(), TrackState::None)?;
                    Ok(item)
                }
                None => {
                    let item = factory();
                    self.track(key.clone(), item.clone(), TrackState::Added)?;
                    self.change_set.borrow_mut().insert(key.clone());
                    Ok(item)
                }
            },
        }
    }

    /// Seeks to the entry at `key_or_prefix` and scans in `direction`.
    ///
    /// Forward scans yield keys `>= key_or_prefix` ascending, backward scans
    /// yield keys `<= key_or_prefix` descending. Tracked entries shadow the
    /// backend. Entries tracked after the call are not observed.
    pub fn seek(
        &self,
        key_or_prefix: &[u8],
        direction: SeekDirection,
    ) -> StorageResult<SeekResult<'_>> {
        let comparer = direction.comparer();
        let (cached, tracked_keys) = {
            let dictionary = self.entries()?;
            let mut cached: Vec<SeekEntry> = dictionary
                .iter()
                .filter(|(_, trackable)| trackable.state.is_live())
                .map(|(key, trackable)| (key.to_array(), key.clone(), trackable.item.clone()))
                .filter(|(raw, _, _)| comparer.compare(raw, key_or_prefix) != Ordering::Less)
                .collect();
            cached.sort_by(|x, y| comparer.compare(&x.0, &y.0));

            let tracked_keys: HashSet<StorageKey, ByteArrayEqualityComparer> =
                dictionary.keys().cloned().collect();
            (cached, tracked_keys)
        };

        let uncached: Box<dyn Iterator<Item = SeekEntry> + '_> = Box::new(
            self.backend
                .seek_internal(key_or_prefix, direction)?
                .filter(move |(key, _)| !tracked_keys.contains(key))
                .map(|(key, item)| (key.to_array(), key, item)),
        );

        Ok(Box::new(SeekMerge {
            comparer,
            cached: cached.into_iter().peekable(),
            uncached: uncached.peekable(),
        }))
    }

    /// Finds the entries whose raw key starts with `key_prefix`.
    ///
    /// A backward find needs a non-empty prefix with at least one byte below
    /// `0xff`; anything else is an [`StorageError::InvalidOperation`].
    pub fn find(
        &self,
        key_prefix: &[u8],
        direction: SeekDirection,
    ) -> StorageResult<SeekResult<'_>> {
        let seek_prefix = match direction {
            SeekDirection::Forward => key_prefix.to_vec(),
            SeekDirection::Backward => backward_seek_prefix(key_prefix)?,
        };

        let prefix = key_prefix.to_vec();
        let mut entries = self.seek(&seek_prefix, direction)?;
        let mut done = false;
        Ok(Box::new(std::iter::from_fn(move || {
            while !done {
                let (key, item) = entries.next()?;
                let raw = key.to_array();
                if raw.starts_with(&prefix) {
                    return Some((key, item));
                }
                if direction == SeekDirection::Forward || raw != seek_prefix {
                    done = true;
                }
            }
            None
        })))
    }

    /// Finds the entries from `start` (inclusive) to `end` (exclusive) in the
    /// order given by `direction`.
    pub fn find_range(
        &self,
        start: &[u8],
        end: &[u8],
        direction: SeekDirection,
    ) -> StorageResult<SeekResult<'_>> {
        let comparer = direction.comparer();
        let end = end.to_vec();
        Ok(Box::new(self.seek(start, direction)?.take_while(
            move |(key, _)| comparer.compare(&key.to_array(), &end) == Ordering::Less,
        )))
    }

    /// The entries waiting for commit, in the order they were first changed.
    pub fn get_change_set(&self) -> StorageResult<Vec<(StorageKey, Trackable)>> {
        let dictionary = self.entries()?;
        let change_set = self
            .change_set
            .borrow()
            .iter()
            .filter_map(|key| {
                dictionary
                    .get(key)
                    .filter(|trackable| trackable.state.is_pending())
                    .map(|trackable| (key.clone(), trackable.clone()))
            })
            .collect();
        Ok(change_set)
    }

    /// Returns true if there are entries waiting for commit.
    pub fn has_changes(&self) -> bool {
        !self.change_set.borrow().is_empty()
    }

    /// Replays the pending entries into the backend.
    ///
    /// Added and changed entries become unmodified, deleted entries are
    /// dropped. If a hook fails the error is returned at once; entries replayed
    /// before it stay committed, the rest keep their state.
    pub fn commit(&self) -> StorageResult<()> {
        let pending: Vec<StorageKey> = self.change_set.borrow().iter().cloned().collect();
        let (mut added, mut changed, mut deleted) = (0usize, 0usize, 0usize);

        for key in pending {
            match self.replay(&key)? {
                Some(TrackState::Added) => {
                    self.set_state(&key, TrackState::None)?;
                    added += 1;
                }
                Some(TrackState::Changed) => {
                    self.set_state(&key, TrackState::None)?;
                    changed += 1;
                }
                Some(TrackState::Deleted) => {
                    self.entries_mut()?.remove(&key);
                    deleted += 1;
                }
                _ => {}
            }
            self.change_set.borrow_mut().shift_remove(&key);
        }

        self.backend.commit_internal()?;
        tracing::debug!(target: "epicchain", added, changed, deleted, "data cache committed");
        Ok(())
    }

    fn replay(&self, key: &StorageKey) -> StorageResult<Option<TrackState>> {
        let dictionary = self.entries()?;
        let Some(trackable) = dictionary.get(key) else {
            return Ok(None);
        };
        match trackable.state {
            TrackState::Added => self.backend.add_internal(key, &trackable.item)?,
            TrackState::Changed => self.backend.update_internal(key, &trackable.item)?,
            TrackState::Deleted => self.backend.delete_internal(key)?,
            TrackState::None | TrackState::NotFound => {}
        }
        Ok(Some(trackable.state))
    }

    // Makes sure the entry is tracked as live and pending. Returns false if it
    // does not exist and there is no factory.
    fn prepare_change<F>(&self, key: &StorageKey, factory: Option<F>) -> StorageResult<bool>
    where
        F: FnOnce() -> StorageItem,
    {
        match self.tracked_state(key)? {
            Some(TrackState::None) => self.set_state(key, TrackState::Changed)?,
            Some(TrackState::Added | TrackState::Changed) => return Ok(true),
            Some(state) => {
                let Some(factory) = factory else {
                    return Ok(false);
                };
                let state = if state == TrackState::Deleted {
                    TrackState::Changed
                } else {
                    TrackState::Added
                };
                self.track(key.clone(), factory(), state)?;
            }
            None => match self.backend.try_get_internal(key)? {
                Some(item) => self.track(key.clone(), item, TrackState::Changed)?,
                None => {
                    let Some(factory) = factory else {
                        return Ok(false);
                    };
                    self.track(key.clone(), factory(), TrackState::Added)?;
                }
            },
        }
        self.change_set.borrow_mut().insert(key.clone());
        Ok(true)
    }

    // The tracked entries stay mutably borrowed while a handle from
    // `get_and_change` is alive; every access goes through these two.
    fn entries(&self) -> StorageResult<Ref<'_, Dictionary>> {
        self.dictionary.try_borrow().map_err(|_| handle_alive())
    }

    fn entries_mut(&self) -> StorageResult<RefMut<'_, Dictionary>> {
        self.dictionary.try_borrow_mut().map_err(|_| handle_alive())
    }

    fn item_mut(&self, key: &StorageKey) -> StorageResult<Option<RefMut<'_, StorageItem>>> {
        Ok(RefMut::filter_map(self.entries_mut()?, |dictionary| {
            dictionary.get_mut(key).map(|trackable| &mut trackable.item)
        })
        .ok())
    }

    fn tracked_state(&self, key: &StorageKey) -> StorageResult<Option<TrackState>> {
        Ok(self.entries()?.get(key).map(|trackable| trackable.state))
    }

    fn track(&self, key: StorageKey, item: StorageItem, state: TrackState) -> StorageResult<()> {
        self.entries_mut()?.insert(key, Trackable::new(item, state));
        Ok(())
    }

    fn set_state(&self, key: &StorageKey, state: TrackState) -> StorageResult<()> {
        if let Some(trackable) = self.entries_mut()?.get_mut(key) {
            trackable.state = state;
        }
        Ok(())
    }
}

fn handle_alive() -> StorageError {
    StorageError::invalid_operation("an item handle from get_and_change is still alive")
}

impl<B: CacheBackend> fmt::Debug for DataCache<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataCache")
            .field("tracked", &self.dictionary.try_borrow().map(|d| d.len()).ok())
            .field("pending", &self.change_set.borrow().len())
            .field("read_only", &self.is_read_only())
            .finish()
    }
}

/// Raw key bytes alongside the typed entry, so merging compares each key once.
type SeekEntry = (Vec<u8>, StorageKey, StorageItem);

struct SeekMerge<'a> {
    comparer: ByteArrayComparer,
    cached: Peekable<std::vec::IntoIter<SeekEntry>>,
    uncached: Peekable<Box<dyn Iterator<Item = SeekEntry> + 'a>>,
}

impl Iterator for SeekMerge<'_> {
    type Item = (StorageKey, StorageItem);

    fn next(&mut self) -> Option<Self::Item> {
        let from_backend = match (self.cached.peek(), self.uncached.peek()) {
            (None, None) => return None,
            (None, Some(_)) => true,
            (Some(_), None) => false,
            (Some(cached), Some(uncached)) => {
                self.comparer.compare(&cached.0, &uncached.0) == Ordering::Greater
            }
        };

        let next = if from_backend {
            self.uncached.next()
        } else {
            self.cached.next()
        };
        next.map(|(_, key, item)| (key, item))
    }
}

// Successor of the prefix: the last byte below 0xff incremented, the rest cut.
fn backward_seek_prefix(key_prefix: &[u8]) -> StorageResult<Vec<u8>> {
    if key_prefix.is_empty() {
        return Err(StorageError::invalid_operation(
            "backward find requires a non-empty prefix",
        ));
    }

    let index = key_prefix
        .iter()
        .rposition(|byte| *byte < u8::MAX)
        .ok_or_else(|| {
            StorageError::invalid_operation(format!(
                "{} has no successor to seek backward from",
                hex::encode(key_prefix)
            ))
        })?;

    let mut seek_prefix = key_prefix[..=index].to_vec();
    seek_prefix[index] += 1;
    Ok(seek_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use std::collections::BTreeMap;

    /// Map-backed backend that records every write hook call.
    #[derive(Default)]
    struct MapBackend {
        entries: RefCell<BTreeMap<Vec<u8>, StorageItem>>,
        calls: RefCell<Vec<String>>,
    }

    impl MapBackend {
        fn with_entries(entries: &[(StorageKey, &[u8])]) -> Self {
            let backend = Self::default();
            for (key, value) in entries {
                backend
                    .entries
                    .borrow_mut()
                    .insert(key.to_array(), StorageItem::new(value.to_vec()));
            }
            backend
        }
    }

    impl CacheBackend for MapBackend {
        fn add_internal(&self, key: &StorageKey, item: &StorageItem) -> StorageResult<()> {
            self.calls.borrow_mut().push(format!("add {key}"));
            self.entries.borrow_mut().insert(key.to_array(), item.clone());
            Ok(())
        }

        fn delete_internal(&self, key: &StorageKey) -> StorageResult<()> {
            self.calls.borrow_mut().push(format!("delete {key}"));
            self.entries.borrow_mut().remove(&key.to_array());
            Ok(())
        }

        fn contains_internal(&self, key: &StorageKey) -> StorageResult<bool> {
            Ok(self.entries.borrow().contains_key(&key.to_array()))
        }

        fn get_internal(&self, key: &StorageKey) -> StorageResult<StorageItem> {
            self.try_get_internal(key)?
                .ok_or_else(|| StorageError::key_not_found(key.to_array()))
        }

        fn try_get_internal(&self, key: &StorageKey) -> StorageResult<Option<StorageItem>> {
            Ok(self.entries.borrow().get(&key.to_array()).cloned())
        }

        fn update_internal(&self, key: &StorageKey, item: &StorageItem) -> StorageResult<()> {
            self.calls.borrow_mut().push(format!("update {key}"));
            self.entries.borrow_mut().insert(key.to_array(), item.clone());
            Ok(())
        }

        fn seek_internal(
            &self,
            key_or_prefix: &[u8],
            direction: SeekDirection,
        ) -> StorageResult<SeekResult<'_>> {
            let comparer = direction.comparer();
            let mut entries: Vec<(StorageKey, StorageItem)> = self
                .entries
                .borrow()
                .iter()
                .filter(|(raw, _)| comparer.compare(raw, key_or_prefix) != Ordering::Less)
                .map(|(raw, item)| (StorageKey::try_from_array(raw).unwrap(), item.clone()))
                .collect();
            entries.sort_by(|x, y| comparer.compare(&x.0.to_array(), &y.0.to_array()));
            Ok(Box::new(entries.into_iter()))
        }
    }

    fn key(id: i32, suffix: &[u8]) -> StorageKey {
        StorageKey::new(id, suffix.to_vec())
    }

    #[test]
    fn test_get_caches_backend_reads() {
        let backend = MapBackend::with_entries(&[(key(1, &[0x01]), &[0xaa])]);
        let cache = DataCache::with_backend(backend);

        assert_eq!(cache.get(&key(1, &[0x01])).unwrap().value(), &[0xaa]);
        cache.backend().entries.borrow_mut().clear();
        assert_eq!(cache.get(&key(1, &[0x01])).unwrap().value(), &[0xaa]);

        let err = cache.get(&key(1, &[0x02])).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_try_get_remembers_misses() {
        let cache = DataCache::with_backend(MapBackend::default());

        assert_eq!(cache.try_get(&key(1, &[0x01])).unwrap(), None);
        cache
            .backend()
            .entries
            .borrow_mut()
            .insert(key(1, &[0x01]).to_array(), StorageItem::new(vec![0x01]));
        assert_eq!(cache.try_get(&key(1, &[0x01])).unwrap(), None);
        assert!(cache.get(&key(1, &[0x01])).is_err());
        assert!(!cache.contains(&key(1, &[0x01])).unwrap());
        assert!(!cache.has_changes());
    }

    #[test]
    fn test_add_state_transitions() {
        let backend = MapBackend::with_entries(&[(key(1, &[0x01]), &[0x01])]);
        let cache = DataCache::with_backend(backend);

        cache.add(key(1, &[0x02]), StorageItem::new(vec![0x02])).unwrap();
        let err = cache.add(key(1, &[0x02]), StorageItem::new(vec![0x03])).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey { .. }));
        assert_eq!(cache.get(&key(1, &[0x02])).unwrap().value(), &[0x02]);

        cache.delete(&key(1, &[0x01])).unwrap();
        cache.add(key(1, &[0x01]), StorageItem::new(vec![0x11])).unwrap();

        let change_set = cache.get_change_set().unwrap();
        assert_eq!(change_set.len(), 2);
        assert_eq!(change_set[0].0, key(1, &[0x02]));
        assert_eq!(change_set[0].1.state, TrackState::Added);
        assert_eq!(change_set[1].1.state, TrackState::Changed);
        assert_eq!(change_set[1].1.item.value(), &[0x11]);
    }

    #[test]
    fn test_delete_semantics() {
        let backend = MapBackend::with_entries(&[(key(1, &[0x01]), &[0x01])]);
        let cache = DataCache::with_backend(backend);

        cache.add(key(1, &[0x02]), StorageItem::new(vec![0x02])).unwrap();
        cache.delete(&key(1, &[0x02])).unwrap();
        assert!(cache.get_change_set().unwrap().is_empty());

        cache.delete(&key(1, &[0x09])).unwrap();
        assert!(cache.get_change_set().unwrap().is_empty());

        cache.delete(&key(1, &[0x01])).unwrap();
        assert!(!cache.contains(&key(1, &[0x01])).unwrap());
        assert_eq!(cache.get_change_set().unwrap()[0].1.state, TrackState::Deleted);

        cache.commit().unwrap();
        assert_eq!(*cache.backend().calls.borrow(), vec!["delete 1:01".to_string()]);
        assert!(!cache.has_changes());
    }

    #[test]
    fn test_get_and_change() {
        let backend = MapBackend::with_entries(&[(key(1, &[0x01]), &[0x01])]);
        let cache = DataCache::with_backend(backend);

        assert!(cache.get_and_change(&key(1, &[0x02])).unwrap().is_none());
        assert!(!cache.has_changes());

        cache
            .get_and_change(&key(1, &[0x01]))
            .unwrap()
            .unwrap()
            .set_value(vec![0x10]);
        cache
            .get_and_change_with(&key(1, &[0x03]), || StorageItem::new(vec![0x30]))
            .unwrap()
            .add_integer(&BigInt::from(1));

        let states: Vec<TrackState> = cache
            .get_change_set()
            .unwrap()
            .into_iter()
            .map(|(_, trackable)| trackable.state)
            .collect();
        assert_eq!(states, vec![TrackState::Changed, TrackState::Added]);
        assert_eq!(cache.get(&key(1, &[0x03])).unwrap().value(), &[0x31]);

        cache.commit().unwrap();
        assert_eq!(
            *cache.backend().calls.borrow(),
            vec!["update 1:01".to_string(), "add 1:03".to_string()]
        );
    }

    #[test]
    fn test_live_handle_blocks_other_operations() {
        let backend = MapBackend::with_entries(&[
            (key(1, &[0x01]), &[0x64]),
            (key(1, &[0x02]), &[0x0a]),
        ]);
        let cache = DataCache::with_backend(backend);

        let mut from = cache.get_and_change(&key(1, &[0x01])).unwrap().unwrap();
        let is_conflict = |err: StorageError| matches!(err, StorageError::InvalidOperation { .. });
        assert!(is_conflict(cache.get_and_change(&key(1, &[0x02])).unwrap_err()));
        assert!(is_conflict(cache.try_get(&key(1, &[0x03])).unwrap_err()));
        assert!(is_conflict(cache.contains(&key(1, &[0x02])).unwrap_err()));
        assert!(is_conflict(
            cache
                .add(key(1, &[0x04]), StorageItem::new(vec![0x04]))
                .unwrap_err()
        ));
        assert!(is_conflict(cache.get_change_set().unwrap_err()));
        assert!(is_conflict(cache.commit().unwrap_err()));
        from.add_integer(&BigInt::from(-30));
        drop(from);

        // Transfers take one handle at a time.
        cache
            .get_and_change(&key(1, &[0x02]))
            .unwrap()
            .unwrap()
            .add_integer(&BigInt::from(30));
        assert_eq!(cache.get(&key(1, &[0x01])).unwrap().to_integer(), BigInt::from(70));
        assert_eq!(cache.get(&key(1, &[0x02])).unwrap().to_integer(), BigInt::from(40));
        assert!(cache.try_get(&key(1, &[0x03])).unwrap().is_none());
        assert!(!cache.contains(&key(1, &[0x04])).unwrap());

        cache.commit().unwrap();
        assert_eq!(
            *cache.backend().calls.borrow(),
            vec!["update 1:01".to_string(), "update 1:02".to_string()]
        );
    }

    #[test]
    fn test_get_or_add() {
        let backend = MapBackend::with_entries(&[(key(1, &[0x01]), &[0x01])]);
        let cache = DataCache::with_backend(backend);

        let existing = cache
            .get_or_add(&key(1, &[0x01]), || StorageItem::new(vec![0xff]))
            .unwrap();
        assert_eq!(existing.value(), &[0x01]);
        assert!(!cache.has_changes());

        let created = cache
            .get_or_add(&key(1, &[0x02]), || StorageItem::new(vec![0x02]))
            .unwrap();
        assert_eq!(created.value(), &[0x02]);
        assert_eq!(cache.get_change_set().unwrap()[0].1.state, TrackState::Added);
    }

    #[test]
    fn test_seek_merges_cache_and_backend() {
        let cache = DataCache::with_backend(MapBackend::with_entries(&[
            (key(0, &[0x01]), &[0x01]),
            (key(0, &[0x03]), &[0x03]),
            (key(0, &[0x05]), &[0x05]),
        ]));

        cache.add(key(0, &[0x02]), StorageItem::new(vec![0x02])).unwrap();
        cache.delete(&key(0, &[0x03])).unwrap();
        cache
            .get_and_change(&key(0, &[0x05]))
            .unwrap()
            .unwrap()
            .set_value(vec![0x50]);

        let forward: Vec<(Vec<u8>, Vec<u8>)> = cache
            .seek(&[], SeekDirection::Forward)
            .unwrap()
            .map(|(k, v)| (k.key().to_vec(), v.into_value()))
            .collect();
        assert_eq!(
            forward,
            vec![
                (vec![0x01], vec![0x01]),
                (vec![0x02], vec![0x02]),
                (vec![0x05], vec![0x50]),
            ]
        );

        let backward: Vec<Vec<u8>> = cache
            .seek(&key(0, &[0x04]).to_array(), SeekDirection::Backward)
            .unwrap()
            .map(|(k, _)| k.key().to_vec())
            .collect();
        assert_eq!(backward, vec![vec![0x02], vec![0x01]]);

        assert_eq!(cache.seek(&[], SeekDirection::Backward).unwrap().count(), 0);
    }

    #[test]
    fn test_find_by_prefix() {
        let cache = DataCache::with_backend(MapBackend::with_entries(&[
            (key(0, &[0x00, 0x01]), &[0x01]),
            (key(0, &[0x01, 0x01]), &[0x02]),
            (key(0, &[0x01, 0x02]), &[0x03]),
            (key(0, &[0x02]), &[0x04]),
        ]));
        cache.add(key(0, &[0x01, 0x00]), StorageItem::new(vec![0x05])).unwrap();

        let prefix = StorageKey::create_search_prefix(0, &[0x01]);
        let forward: Vec<Vec<u8>> = cache
            .find(&prefix, SeekDirection::Forward)
            .unwrap()
            .map(|(k, _)| k.key().to_vec())
            .collect();
        assert_eq!(forward, vec![vec![0x01, 0x00], vec![0x01, 0x01], vec![0x01, 0x02]]);

        let backward: Vec<Vec<u8>> = cache
            .find(&prefix, SeekDirection::Backward)
            .unwrap()
            .map(|(k, _)| k.key().to_vec())
            .collect();
        assert_eq!(backward, vec![vec![0x01, 0x02], vec![0x01, 0x01], vec![0x01, 0x00]]);
    }

    #[test]
    fn test_find_backward_rejects_unbounded_prefixes() {
        let cache = DataCache::with_backend(MapBackend::default());
        assert!(matches!(
            cache.find(&[], SeekDirection::Backward).err(),
            Some(StorageError::InvalidOperation { .. })
        ));
        assert!(matches!(
            cache.find(&[0xff, 0xff], SeekDirection::Backward).err(),
            Some(StorageError::InvalidOperation { .. })
        ));
        assert_eq!(backward_seek_prefix(&[0x01, 0xff]).unwrap(), vec![0x02]);
        assert_eq!(backward_seek_prefix(&[0x01, 0x05]).unwrap(), vec![0x01, 0x06]);
    }

    #[test]
    fn test_find_range() {
        let cache = DataCache::with_backend(MapBackend::with_entries(&[
            (key(0, &[0x01]), &[0x01]),
            (key(0, &[0x02]), &[0x02]),
            (key(0, &[0x03]), &[0x03]),
        ]));

        let start = key(0, &[0x01]).to_array();
        let end = key(0, &[0x03]).to_array();
        let forward: Vec<Vec<u8>> = cache
            .find_range(&start, &end, SeekDirection::Forward)
            .unwrap()
            .map(|(k, _)| k.key().to_vec())
            .collect();
        assert_eq!(forward, vec![vec![0x01], vec![0x02]]);

        let backward: Vec<Vec<u8>> = cache
            .find_range(&end, &start, SeekDirection::Backward)
            .unwrap()
            .map(|(k, _)| k.key().to_vec())
            .collect();
        assert_eq!(backward, vec![vec![0x03], vec![0x02]]);
    }

    #[test]
    fn test_commit_resets_states() {
        let cache = DataCache::with_backend(MapBackend::default());
        cache.add(key(2, &[0x01]), StorageItem::new(vec![0x01])).unwrap();
        cache.commit().unwrap();

        assert!(cache.get_change_set().unwrap().is_empty());
        assert_eq!(cache.get(&key(2, &[0x01])).unwrap().value(), &[0x01]);

        // Unmodified after commit, so a second commit replays nothing.
        cache.commit().unwrap();
        assert_eq!(cache.backend().calls.borrow().len(), 1);
    }
}
