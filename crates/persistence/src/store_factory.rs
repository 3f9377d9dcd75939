// Copyright (C) 2021-2025 EpicChain Labs.
//
// store_factory.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::error::{StorageError, StorageResult};
use crate::providers::MemoryStoreProvider;
use crate::traits::{Store, StoreProvider};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry of store providers, keyed by name.
///
/// Built once at startup and handed to whatever opens stores. The empty name
/// resolves to the default engine.
#[derive(Clone)]
pub struct StoreFactory {
    providers: HashMap<String, Arc<dyn StoreProvider>>,
}

impl StoreFactory {
    /// Creates a factory with the in-memory provider registered under its own
    /// name and as the default.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        let memory: Arc<dyn StoreProvider> = Arc::new(MemoryStoreProvider::new());
        factory.register_provider(MemoryStoreProvider::NAME, memory.clone());
        factory.register_provider("", memory);
        factory
    }

    /// Creates a factory with no providers.
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Registers a provider under `name`, replacing any previous one.
    pub fn register_provider(
        &mut self,
        name: impl Into<String>,
        provider: Arc<dyn StoreProvider>,
    ) {
        let name = name.into();
        tracing::debug!(
            target: "epicchain",
            name = %name,
            provider = provider.name(),
            "store provider registered"
        );
        self.providers.insert(name, provider);
    }

    /// Registers a provider under its own name.
    pub fn register(&mut self, provider: Arc<dyn StoreProvider>) {
        let name = provider.name().to_string();
        self.register_provider(name, provider);
    }

    /// Gets a provider by name.
    pub fn get_store_provider(&self, name: &str) -> Option<Arc<dyn StoreProvider>> {
        self.providers.get(name).cloned()
    }

    /// Names of the registered providers, sorted.
    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Opens a store with the named provider.
    ///
    /// # Arguments
    /// * `storage_provider` - The provider name. Empty selects the default.
    /// * `path` - Where the store lives. The in-memory engine ignores it.
    pub fn get_store(&self, storage_provider: &str, path: &str) -> StorageResult<Arc<dyn Store>> {
        let provider = self
            .get_store_provider(storage_provider)
            .ok_or_else(|| StorageError::provider_not_found(storage_provider))?;
        tracing::debug!(target: "epicchain", provider = storage_provider, path, "opening store");
        provider.get_store(path)
    }
}

impl Default for StoreFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StoreFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreFactory")
            .field("providers", &self.provider_names())
            .finish()
    }
}
