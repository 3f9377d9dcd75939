// Copyright (C) 2021-2025 EpicChain Labs.
//
// memory_store_provider.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use super::memory_store::MemoryStore;
use crate::error::StorageResult;
use crate::traits::{Store, StoreProvider};
use std::sync::Arc;

/// Opens in-memory stores. The path is ignored and every call returns a new,
/// empty store.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryStoreProvider;

impl MemoryStoreProvider {
    /// Name the provider registers under.
    pub const NAME: &'static str = "MemoryStore";

    /// Creates a new provider.
    pub fn new() -> Self {
        Self
    }
}

impl StoreProvider for MemoryStoreProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn get_store(&self, _path: &str) -> StorageResult<Arc<dyn Store>> {
        Ok(Arc::new(MemoryStore::new()))
    }
}
