//! Durable key-value storage for user preferences.

pub mod connection;
pub mod queries;

use std::collections::HashMap;
use std::path::Path;

use rusqlite::Connection;

use crate::error::StorageError;

/// Synchronous key-value backend. A `write` has completed durably by the
/// time it returns `Ok`.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// All stored keys and raw values, ordered by key.
    fn entries(&self) -> Result<Vec<(String, String)>, StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn entries(&self) -> Result<Vec<(String, String)>, StorageError> {
        (**self).entries()
    }
}

/// Opens the SQLite store in `data_dir`, or a [`MemoryStore`] when the
/// database cannot be opened. Preferences then last for this session only.
pub fn open_or_memory(data_dir: &Path) -> Box<dyn KeyValueStore> {
    match SqliteStore::open(data_dir) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(
                error = %e,
                dir = %data_dir.display(),
                "preference database unavailable, keeping preferences in memory"
            );
            Box::new(MemoryStore::new())
        }
    }
}

/// SQLite-backed store, one row per key.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            conn: connection::init_db(data_dir)?,
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(queries::get_value(&self.conn, key)?)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        queries::set_value(&self.conn, key, value)?;
        Ok(())
    }

    fn entries(&self) -> Result<Vec<(String, String)>, StorageError> {
        Ok(queries::list_values(&self.conn)?)
    }
}

/// Process-local store for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn entries(&self) -> Result<Vec<(String, String)>, StorageError> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let mut store = SqliteStore::open(dir.path()).unwrap();
            store.write("dark_mode", "true").unwrap();
            store.write("dark_mode", "false").unwrap();
            store.write("favorites", "[\"movie:550\"]").unwrap();
        }

        let store = SqliteStore::open(dir.path()).unwrap();
        assert_eq!(store.read("dark_mode").unwrap().as_deref(), Some("false"));
        assert_eq!(store.read("missing").unwrap(), None);
        assert_eq!(
            store.entries().unwrap(),
            vec![
                ("dark_mode".to_string(), "false".to_string()),
                ("favorites".to_string(), "[\"movie:550\"]".to_string()),
            ]
        );
    }

    #[test]
    fn unreadable_database_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(connection::DB_FILE),
            "definitely not a sqlite file\n".repeat(200),
        )
        .unwrap();
        assert!(SqliteStore::open(dir.path()).is_err());

        let mut store = open_or_memory(dir.path());
        assert_eq!(store.read("favorites").unwrap(), None);
        store.write("favorites", "[\"tv:1399\"]").unwrap();
        assert_eq!(
            store.entries().unwrap(),
            vec![("favorites".to_string(), "[\"tv:1399\"]".to_string())]
        );
    }

    #[test]
    fn healthy_database_is_used() {
        let dir = tempfile::tempdir().unwrap();
        open_or_memory(dir.path()).write("dark_mode", "true").unwrap();

        let store = SqliteStore::open(dir.path()).unwrap();
        assert_eq!(store.read("dark_mode").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn memory_store_reads_back_writes() {
        let mut store = MemoryStore::new();
        assert_eq!(store.read("ratings").unwrap(), None);
        store.write("ratings", "{}").unwrap();
        assert_eq!(store.read("ratings").unwrap().as_deref(), Some("{}"));
    }
}
