//! An in-memory implementation of the key-value store contract.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::Error;

use super::KeyValueStore;

/// A [KeyValueStore] backed by a shared in-memory map.
///
/// Clones share the same underlying map, so a store handed to a
/// [Ledger](crate::Ledger) can still be inspected by the caller. This is the
/// backing used by the test suite and is suitable for embedders that provide
/// their own durability (or need none).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        self.entries.lock().unwrap().remove(key);

        Ok(())
    }
}
