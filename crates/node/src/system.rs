use anyhow::{bail, Context, Result};
use epicchain_config::StorageSection;
use epicchain_persistence::{
    ReadOnlyStore, SeekDirection, SnapshotCache, StorageError, StorageItem, StorageKey,
    StorageResult, Store, StoreFactory,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

const PROBE_ID: i32 = i32::MIN;
const PROBE_KEY: &[u8] = b"epicchain-node/storage-check";
const PROBE_VALUE: &[u8] = &[0xde, 0xad, 0xbe, 0xef];

/// Owns the opened physical store and hands out caches over it.
pub struct StorageSystem {
    store: Arc<dyn Store>,
    engine: String,
    path: String,
    read_only: bool,
}

impl StorageSystem {
    /// Opens the store named by `[storage] engine` through `factory`.
    pub fn open(factory: &StoreFactory, section: &StorageSection) -> Result<Self> {
        let engine = section.engine.trim();
        let store = factory.get_store(engine, &section.path).with_context(|| {
            let registered: Vec<&str> = factory
                .provider_names()
                .into_iter()
                .filter(|name| !name.is_empty())
                .collect();
            format!(
                "failed to open storage engine '{}' (registered: {})",
                engine,
                registered.join(", ")
            )
        })?;
        info!(
            target: "epicchain",
            engine,
            path = %section.path,
            read_only = section.read_only,
            "storage opened"
        );
        Ok(Self {
            store,
            engine: engine.to_string(),
            path: section.path.clone(),
            read_only: section.read_only,
        })
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// A read-only cache over the live store.
    pub fn store_view(&self) -> SnapshotCache {
        SnapshotCache::from_store(self.store.clone())
    }

    /// A writable cache over a fresh snapshot of the store.
    pub fn snapshot_cache(&self) -> StorageResult<SnapshotCache> {
        if self.read_only {
            return Err(StorageError::invalid_operation(
                "storage was opened read-only; snapshots are unavailable",
            ));
        }
        Ok(SnapshotCache::new(self.store.get_snapshot()))
    }

    /// Entries whose raw key starts with `prefix`, in ascending key order.
    pub fn dump(&self, prefix: &[u8]) -> StorageResult<Vec<(StorageKey, StorageItem)>> {
        let view = self.store_view();
        let entries = view.find(prefix, SeekDirection::Forward)?.collect();
        Ok(entries)
    }

    /// Number of entries in the store, counted without collecting them.
    pub fn entry_count(&self) -> StorageResult<usize> {
        let view = self.store_view();
        let count = view.seek(&[], SeekDirection::Forward)?.count();
        Ok(count)
    }

    /// Runs a probe write through a cloned cache and a snapshot cache.
    ///
    /// Checks that neither layer leaks uncommitted writes into the one below
    /// it, that a committed write reaches the store, and removes the probe
    /// afterwards. Read-only systems only verify that the store can be read.
    pub fn check_storage(&self) -> Result<()> {
        let key = StorageKey::new(PROBE_ID, PROBE_KEY);

        if self.read_only {
            self.store_view()
                .try_get(&key)
                .context("storage check: probe read failed")?;
            let entries = self.entry_count()?;
            info!(target: "epicchain", entries, "storage check: read-only store is readable");
            return Ok(());
        }

        let raw_key = key.to_array();
        if self.store.contains(&raw_key)? {
            bail!("storage check: probe key {key} is already present in the store");
        }

        let cache = self.snapshot_cache()?;
        {
            let clone = cache.create_snapshot();
            clone
                .add(key.clone(), StorageItem::new(PROBE_VALUE.to_vec()))
                .context("storage check: probe write failed")?;
            if cache.contains(&key)? {
                bail!("storage check: cloned cache write is visible before commit");
            }
            clone.commit().context("storage check: cloned cache commit failed")?;
        }
        if !cache.contains(&key)? {
            bail!("storage check: cloned cache commit did not reach its parent");
        }
        if self.store.contains(&raw_key)? {
            bail!("storage check: snapshot cache write is visible in the store before commit");
        }
        cache.commit().context("storage check: snapshot commit failed")?;
        debug!(target: "epicchain", "storage check: probe committed");

        match self.store_view().try_get(&key)? {
            Some(item) if item.value() == PROBE_VALUE => {}
            Some(item) => bail!(
                "storage check: probe read back as {} instead of {}",
                hex::encode(item.value()),
                hex::encode(PROBE_VALUE)
            ),
            None => bail!("storage check: committed probe is missing from the store"),
        }

        let cleanup = self.snapshot_cache()?;
        cleanup.delete(&key)?;
        cleanup.commit().context("storage check: probe cleanup failed")?;
        if self.store.contains(&raw_key)? {
            bail!("storage check: probe is still present after cleanup");
        }

        info!(target: "epicchain", engine = %self.engine, "storage check passed");
        Ok(())
    }
}

impl fmt::Debug for StorageSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSystem")
            .field("engine", &self.engine)
            .field("path", &self.path)
            .field("read_only", &self.read_only)
            .finish()
    }
}
