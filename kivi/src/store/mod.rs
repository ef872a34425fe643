//! Key/value store used by the HTTP front end.
//!
//! The [`Store`] trait is the boundary the API layer talks to. The only
//! implementation today is [`InMemoryStore`], backed by a hash map.
//!
//! # Invariants
//!
//! - `create_item` never overwrites an existing key
//! - `get_item`, `update_item` and `delete_item` never create a key

mod memory;

use std::fmt;

pub use memory::InMemoryStore;

/// CRUD operations over string keys and string values.
///
/// All methods take `&self`; implementations synchronize internally so a
/// store can be shared between request handlers.
pub trait Store: Send + Sync {
    /// Insert a new item. Fails if the key already exists.
    fn create_item(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Read an item's value. Fails if the key is absent.
    fn get_item(&self, key: &str) -> Result<String, StoreError>;

    /// Replace an existing item's value. Fails if the key is absent.
    fn update_item(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Remove an item. Fails if the key is absent.
    fn delete_item(&self, key: &str) -> Result<(), StoreError>;
}

/// Errors returned by [`Store`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `create_item` was called with a key that is already present.
    AlreadyExists(String),
    /// The key is not present.
    NotFound(String),
    /// The store's lock was poisoned by a panicking writer.
    LockPoisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists(key) => write!(f, "item {key} already exists"),
            Self::NotFound(key) => write!(f, "item {key} not found"),
            Self::LockPoisoned => f.write_str("store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}
