//! Favorites persistence behavior

use dexterm::favorites::{FavoritesStore, KvStore, MemoryKv, SqliteKv, StoreError, FAVORITES_KEY};

/// Backend whose writes always fail (full disk, read-only file).
#[derive(Default)]
struct ReadOnlyKv {
    inner: MemoryKv,
}

impl KvStore for ReadOnlyKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }
    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only".into()))
    }
}

fn persisted<S: KvStore>(store: &FavoritesStore<S>) -> Option<String> {
    store.backend().get(FAVORITES_KEY).unwrap()
}

#[test]
fn add_twice_then_remove_persists_empty_list() {
    let mut store = FavoritesStore::open(MemoryKv::new());
    store.add(25).unwrap();
    store.add(25).unwrap();
    assert_eq!(store.list(), &[25]);
    store.remove(25).unwrap();
    assert!(store.list().is_empty());
    assert_eq!(persisted(&store).as_deref(), Some("[]"));
}

#[test]
fn toggle_twice_restores_list_and_slot() {
    let mut store = FavoritesStore::open(MemoryKv::with_slot(FAVORITES_KEY, "[1,4]"));
    let before = store.list().to_vec();

    for id in [4, 7] {
        let first = store.toggle(id).unwrap();
        let second = store.toggle(id).unwrap();
        assert_ne!(first, second);
        let mut now = store.list().to_vec();
        now.sort_unstable();
        let mut expected = before.clone();
        expected.sort_unstable();
        assert_eq!(now, expected);
    }
    let raw = persisted(&store).unwrap();
    let mut saved: Vec<u32> = serde_json::from_str(&raw).unwrap();
    saved.sort_unstable();
    assert_eq!(saved, vec![1, 4]);
}

#[test]
fn slot_always_mirrors_memory() {
    let mut store = FavoritesStore::open(MemoryKv::new());
    for id in [3, 9, 3, 12] {
        store.toggle(id).unwrap();
        let saved: Vec<u32> = serde_json::from_str(&persisted(&store).unwrap()).unwrap();
        assert_eq!(saved, store.list());
    }
    assert_eq!(store.list(), &[9, 12]);
    store.clear().unwrap();
    assert_eq!(persisted(&store).as_deref(), Some("[]"));
}

#[test]
fn failed_write_leaves_memory_unchanged() {
    let mut store = FavoritesStore::open(ReadOnlyKv {
        inner: MemoryKv::with_slot(FAVORITES_KEY, "[6]"),
    });
    let rx = store.subscribe();

    assert!(store.add(150).is_err());
    assert!(store.toggle(6).is_err());
    assert!(store.clear().is_err());
    assert_eq!(store.list(), &[6]);
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn sqlite_slot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.db");

    {
        let mut store = FavoritesStore::open(SqliteKv::open(&path).unwrap());
        store.add(133).unwrap();
        store.add(1).unwrap();
        store.remove(133).unwrap();
        store.add(94).unwrap();
    }

    let store = FavoritesStore::open(SqliteKv::open(&path).unwrap());
    assert_eq!(store.list(), &[1, 94]);
    assert_eq!(persisted(&store).as_deref(), Some("[1,94]"));
}

#[test]
fn boxed_backend_behaves_like_inner() {
    let backend: Box<dyn KvStore + Send> = Box::new(SqliteKv::open_in_memory().unwrap());
    let mut store = FavoritesStore::open(backend);
    assert!(store.toggle(42).unwrap());
    assert!(store.contains(42));
    assert_eq!(persisted(&store).as_deref(), Some("[42]"));
}
