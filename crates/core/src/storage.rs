//! Key/value storage backing credentials and session state
//!
//! Browser builds plug in cookie and `sessionStorage` implementations; native
//! builds and tests use [`MemoryStore`].

use crate::error::{CoreError, CoreResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// String key/value storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    fn remove(&self, key: &str) -> CoreResult<()>;

    /// Read and remove a value in one step
    fn take(&self, key: &str) -> CoreResult<Option<String>> {
        let value = self.get(key);
        if value.is_some() {
            self.remove(key)?;
        }
        Ok(value)
    }
}

/// In-process storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with initial entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

fn poisoned() -> CoreError {
    CoreError::storage("memory store lock poisoned")
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.entries
            .write()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.entries.write().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }

    fn take(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.write().map_err(|_| poisoned())?.remove(key))
    }
}
