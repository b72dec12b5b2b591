use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{KeyValueStore, SharedStore};
use crate::error::{Error, Result};

/// Process-local store. Backs tests and embedders that do not need durability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| Error::Storage("memory store mutex poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{load_json, save_json};

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn corrupt_json_reads_as_absent() {
        let store = MemoryStore::new();
        store.set("list", "[1, 2,").unwrap();
        let loaded: Option<Vec<i32>> = load_json(&store, "list");
        assert!(loaded.is_none());

        save_json(&store, "list", &vec![1, 2]).unwrap();
        let loaded: Option<Vec<i32>> = load_json(&store, "list");
        assert_eq!(loaded, Some(vec![1, 2]));
    }
}
