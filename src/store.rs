//! Persistent key-value settings.
//!
//! The viewer only ever stores the preferred metadata URL, but keeps the
//! store behind a trait so the resolver can be exercised without a database.

use crate::error::StoreError;
use sled::Db;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

pub trait MetaStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

// ============================================================================
// Sled Store
// ============================================================================

const SETTINGS_TREE: &str = "settings";

pub struct SledStore {
    tree: sled::Tree,
}

impl SledStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &Db) -> Result<Self, StoreError> {
        Ok(Self {
            tree: db.open_tree(SETTINGS_TREE)?,
        })
    }
}

impl MetaStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.tree.get(key)? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| StoreError::Encoding),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.tree.insert(key, value.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }
}

// ============================================================================
// In-memory Store
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(entries: &[(&str, &str)]) -> Self {
        let values = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }
}

impl MetaStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sled_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path().join("db")).unwrap();

        assert_eq!(store.get("notesMetaUrl").unwrap(), None);
        store.set("notesMetaUrl", "https://api.example.com/metadata").unwrap();
        assert_eq!(
            store.get("notesMetaUrl").unwrap().as_deref(),
            Some("https://api.example.com/metadata")
        );
    }

    #[test]
    fn test_sled_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db");
        {
            let store = SledStore::open(&path).unwrap();
            store.set("k", "v").unwrap();
        }
        let store = SledStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
