//! Key-value persistence used by every component.
//!
//! Values are whole JSON documents stored under string keys. Components never
//! reach for ambient state; they receive a [`SharedStore`] and go through
//! [`load_json`] / [`save_json`].

pub mod file;
pub mod keys;
pub mod memory;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Reads and decodes `key`.
///
/// Missing keys, unreadable entries and corrupt JSON all come back as `None`;
/// the last two are logged and otherwise treated as absence of data.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read persisted value");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding corrupt persisted value");
            None
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
