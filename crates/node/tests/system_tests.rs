use epicchain_config::{NodeConfig, StorageSection};
use epicchain_node::StorageSystem;
use epicchain_persistence::{
    MemoryStore, ReadOnlyStore, SeekDirection, StorageError, StorageItem, StorageKey,
    StorageResult, Store, StoreFactory, StoreProvider, WriteStore,
};
use std::io::Write;
use std::sync::Arc;

/// Hands out the same store for every path so tests can inspect it.
struct SharedProvider {
    store: MemoryStore,
}

impl StoreProvider for SharedProvider {
    fn name(&self) -> &str {
        "Shared"
    }

    fn get_store(&self, _path: &str) -> StorageResult<Arc<dyn Store>> {
        Ok(Arc::new(self.store.clone()))
    }
}

fn shared_factory() -> (StoreFactory, MemoryStore) {
    let store = MemoryStore::new();
    let mut factory = StoreFactory::new();
    factory.register(Arc::new(SharedProvider {
        store: store.clone(),
    }));
    (factory, store)
}

fn section(engine: &str, read_only: bool) -> StorageSection {
    StorageSection {
        engine: engine.to_string(),
        path: String::new(),
        read_only,
    }
}

#[test]
fn unknown_engine_fails_to_open() {
    let err = StorageSystem::open(&StoreFactory::new(), &section("LevelDBStore", false))
        .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("LevelDBStore"), "unexpected error: {message}");
    assert!(message.contains("MemoryStore"), "unexpected error: {message}");
}

#[test]
fn snapshot_cache_commit_is_visible_through_store_view() {
    let (factory, store) = shared_factory();
    let system = StorageSystem::open(&factory, &section("Shared", false)).unwrap();
    let key = StorageKey::new(7, vec![0x01, 0x02]);

    let cache = system.snapshot_cache().unwrap();
    cache.add(key.clone(), StorageItem::new(vec![0x0a])).unwrap();
    assert!(system.store_view().try_get(&key).unwrap().is_none());
    assert_eq!(system.entry_count().unwrap(), 0);

    cache.commit().unwrap();
    assert_eq!(system.store_view().get(&key).unwrap().value(), &[0x0a]);
    assert_eq!(store.len(), 1);
    assert_eq!(system.entry_count().unwrap(), 1);
}

#[test]
fn store_view_is_read_only() {
    let (factory, _store) = shared_factory();
    let system = StorageSystem::open(&factory, &section("Shared", false)).unwrap();
    assert!(system.store_view().is_read_only());
    assert!(!system.snapshot_cache().unwrap().is_read_only());
}

#[test]
fn read_only_system_refuses_snapshots() {
    let (factory, store) = shared_factory();
    store.put(StorageKey::new(1, vec![0x01]).to_array(), vec![0x99]).unwrap();

    let system = StorageSystem::open(&factory, &section("Shared", true)).unwrap();
    assert!(matches!(
        system.snapshot_cache(),
        Err(StorageError::InvalidOperation { .. })
    ));
    system.check_storage().unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn check_storage_preserves_existing_entries() {
    let (factory, store) = shared_factory();
    let existing = StorageKey::new(3, vec![0xaa]);
    store.put(existing.to_array(), vec![0x01]).unwrap();

    let system = StorageSystem::open(&factory, &section("Shared", false)).unwrap();
    system.check_storage().unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.try_get(&existing.to_array()).unwrap(), Some(vec![0x01]));
}

#[test]
fn dump_filters_by_raw_prefix() {
    let (factory, store) = shared_factory();
    for (id, key) in [(1, 0x01u8), (1, 0x02), (2, 0x01)] {
        store.put(StorageKey::new(id, vec![key]).to_array(), vec![key]).unwrap();
    }
    let system = StorageSystem::open(&factory, &section("Shared", false)).unwrap();
    assert_eq!(system.entry_count().unwrap(), 3);

    let prefix = StorageKey::create_search_prefix(1, &[]);
    let dumped = system.dump(&prefix).unwrap();
    let keys: Vec<StorageKey> = dumped.into_iter().map(|(key, _)| key).collect();
    assert_eq!(
        keys,
        vec![StorageKey::new(1, vec![0x01]), StorageKey::new(1, vec![0x02])]
    );

    let view = system.store_view();
    let backward: Vec<StorageKey> = view
        .find(&prefix, SeekDirection::Backward)
        .unwrap()
        .map(|(key, _)| key)
        .collect();
    assert_eq!(
        backward,
        vec![StorageKey::new(1, vec![0x02]), StorageKey::new(1, vec![0x01])]
    );
}

#[test]
fn system_opens_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[storage]\nengine = \"MemoryStore\"\npath = \"unused\"").unwrap();

    let config = NodeConfig::load(file.path()).unwrap();
    let system = StorageSystem::open(&StoreFactory::new(), &config.storage).unwrap();
    assert_eq!(system.engine(), "MemoryStore");
    system.check_storage().unwrap();
}
