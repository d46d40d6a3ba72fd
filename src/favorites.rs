//! Favorites store backed by a single key-value slot.
//!
//! The slot holds a JSON array of catalog numbers. Every mutation writes the
//! new list first and only then updates memory and notifies subscribers, so a
//! failed write leaves both sides untouched.

use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::watch;

#[cfg(feature = "native")]
use rusqlite::{params, Connection, OptionalExtension};
#[cfg(feature = "native")]
use std::path::Path;

pub const FAVORITES_KEY: &str = "pokedex-favorites";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not encode favorites: {0}")]
    Encode(#[from] serde_json::Error),

    #[cfg(feature = "native")]
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String-valued key-value storage (the local persistence seam).
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<K: KvStore + ?Sized> KvStore for Box<K> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    slots: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut kv = Self::new();
        kv.slots.insert(key.to_string(), value.to_string());
        kv
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// SQLite file holding one `kv` table.
#[cfg(feature = "native")]
pub struct SqliteKv {
    conn: Connection,
}

#[cfg(feature = "native")]
impl SqliteKv {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(std::time::Duration::from_millis(250))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv(
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }
}

#[cfg(feature = "native")]
impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

pub struct FavoritesStore<S: KvStore> {
    backend: S,
    key: String,
    ids: Vec<u32>,
    notify: watch::Sender<Vec<u32>>,
}

impl<S: KvStore> FavoritesStore<S> {
    pub fn open(backend: S) -> Self {
        Self::open_with_key(backend, FAVORITES_KEY)
    }

    /// Load the slot once. Missing or unreadable values start an empty list;
    /// the failure is logged, never returned.
    pub fn open_with_key(backend: S, key: &str) -> Self {
        let ids = match backend.get(key) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<u32>>(&raw).unwrap_or_else(|e| {
                log::error!("[favorites] ignoring unparsable slot {key:?}: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::error!("[favorites] could not read slot {key:?}: {e}");
                Vec::new()
            }
        };
        let (notify, _) = watch::channel(ids.clone());
        Self {
            backend,
            key: key.to_string(),
            ids,
            notify,
        }
    }

    pub fn list(&self) -> &[u32] {
        &self.ids
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    /// Adding an identifier already present is a no-op.
    pub fn add(&mut self, id: u32) -> Result<(), StoreError> {
        if self.contains(id) {
            return Ok(());
        }
        let mut next = self.ids.clone();
        next.push(id);
        self.commit(next)
    }

    pub fn remove(&mut self, id: u32) -> Result<(), StoreError> {
        let next: Vec<u32> = self.ids.iter().copied().filter(|&x| x != id).collect();
        self.commit(next)
    }

    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle(&mut self, id: u32) -> Result<bool, StoreError> {
        if self.contains(id) {
            self.remove(id)?;
            Ok(false)
        } else {
            self.add(id)?;
            Ok(true)
        }
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.commit(Vec::new())
    }

    /// Observe the list; receivers see every committed change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<u32>> {
        self.notify.subscribe()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    fn commit(&mut self, next: Vec<u32>) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&next)?;
        self.backend.set(&self.key, &raw)?;
        self.ids = next;
        self.notify.send_replace(self.ids.clone());
        Ok(())
    }
}
