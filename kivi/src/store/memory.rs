use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::RwLock;

use crate::store::{Store, StoreError};

/// A [`Store`] keeping every item in a `HashMap`.
///
/// Uses `RwLock` so concurrent reads do not block each other.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub fn len(&self) -> Result<usize, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(data.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl Store for InMemoryStore {
    fn create_item(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        match data.entry(key.to_owned()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(key.to_owned())),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    fn get_item(&self, key: &str) -> Result<String, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned)?;
        data.get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }

    fn update_item(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.data
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .get_mut(key)
            .map(|slot| *slot = value)
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }

    fn delete_item(&self, key: &str) -> Result<(), StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        data.remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }
}
