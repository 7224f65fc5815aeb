//! Best-effort key-value persistence
//!
//! The game only stores a handful of small strings (best score, settings).
//! On the web they go to LocalStorage; natively and in tests they live in
//! memory.

use std::collections::HashMap;

#[cfg(any(target_arch = "wasm32", test))]
use crate::error::GameError;
use crate::error::GameResult;

/// A persistent string record store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> GameResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> GameResult<()>;
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> GameResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    /// Open the window's LocalStorage (fails in private modes that disable it)
    pub fn open() -> GameResult<Self> {
        let storage = web_sys::window()
            .ok_or_else(|| GameError::Storage("no window".into()))?
            .local_storage()
            .map_err(|e| GameError::Storage(format!("{e:?}")))?
            .ok_or_else(|| GameError::Storage("LocalStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| GameError::Storage(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> GameResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| GameError::Storage(format!("{e:?}")))
    }
}

/// Store that rejects writes, for exercising failure paths
#[cfg(test)]
pub(crate) struct ReadOnlyStore(pub MemoryStore);

#[cfg(test)]
impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        self.0.get(key)
    }

    fn set(&mut self, _key: &str, _value: &str) -> GameResult<()> {
        Err(GameError::Storage("quota exceeded".into()))
    }
}
