// Copyright (C) 2021-2025 EpicChain Labs.
//
// lib.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! # EpicChain Persistence Layer
//!
//! Change-tracking caches between the node's consumers (contract execution,
//! native contracts, block processing) and the physical key-value store.
//!
//! ## Architecture
//!
//! - **Physical stores**: [`ReadOnlyStore`], [`WriteStore`], [`StoreSnapshot`]
//!   and [`Store`] over raw byte keys, opened through a [`StoreFactory`] of
//!   named [`StoreProvider`]s. [`MemoryStore`] is the reference engine.
//! - **DataCache**: a generic change-tracking cache over a [`CacheBackend`].
//!   Every entry carries a [`TrackState`]; writes stay in memory until
//!   `commit` replays them through the backend hooks.
//! - **SnapshotCache**: a [`DataCache`] bound to a physical snapshot.
//! - **ClonedCache**: a [`DataCache`] layered over another cache. Dropping it
//!   without committing discards its work.
//!
//! ## Example Usage
//!
//! ```rust
//! use epicchain_persistence::{
//!     MemoryStore, SnapshotCache, StorageItem, StorageKey, Store, StorageResult,
//! };
//! use std::sync::Arc;
//!
//! # fn example() -> StorageResult<()> {
//! let store = Arc::new(MemoryStore::new());
//! let cache = SnapshotCache::new(store.get_snapshot());
//!
//! // Run a unit of work in a disposable layer.
//! let work = cache.create_snapshot();
//! work.add(StorageKey::new(5, vec![0x01]), StorageItem::new(vec![0xaa]))?;
//! work.commit()?;
//!
//! // Flush to the store.
//! cache.commit()?;
//!
//! let view = SnapshotCache::from_store(store);
//! assert_eq!(view.get(&StorageKey::new(5, vec![0x01]))?.value(), &[0xaa]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

pub mod cloned_cache;
pub mod data_cache;
pub mod error;
pub mod key_builder;
pub mod providers;
pub mod seek_direction;
pub mod snapshot_cache;
pub mod storage_item;
pub mod storage_key;
pub mod store_factory;
pub mod track_state;
pub mod traits;

pub use cloned_cache::{ClonedCache, ClonedStore};
pub use data_cache::{CacheBackend, DataCache, SeekResult, Trackable};
pub use error::{StorageError, StorageResult};
pub use key_builder::KeyBuilder;
pub use providers::{MemorySnapshot, MemoryStore, MemoryStoreProvider};
pub use seek_direction::SeekDirection;
pub use snapshot_cache::{SnapshotCache, SnapshotStore};
pub use storage_item::StorageItem;
pub use storage_key::StorageKey;
pub use store_factory::StoreFactory;
pub use track_state::TrackState;
pub use traits::{ReadOnlyStore, SeekIter, Store, StoreProvider, StoreSnapshot, WriteStore};
