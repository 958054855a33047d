//! Durable key-value storage for the Rocket Shoes cart.
//!
//! The cart is stored as a single JSON document under one namespaced key.
//! [`PersistentStore`] is the raw string seam; [`JsonStore`] layers typed
//! serialization on top of any implementation.
//!
//! # Example
//!
//! ```rust
//! use rocket_store::{JsonStore, MemoryStore};
//! use std::sync::Arc;
//!
//! let store = JsonStore::new(Arc::new(MemoryStore::new()));
//!
//! store.set("@RocketShoes:cart", &vec![1, 2, 3]).unwrap();
//! let restored: Option<Vec<u32>> = store.get("@RocketShoes:cart").unwrap();
//! assert_eq!(restored, Some(vec![1, 2, 3]));
//! ```

mod error;
mod file;
mod json;
mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use json::JsonStore;
pub use memory::MemoryStore;

/// Raw string storage addressed by key.
///
/// Reads and writes are synchronous and whole-value: a write either replaces
/// the stored value completely or leaves the previous one in place.
pub trait PersistentStore: Send + Sync {
    /// Read the value stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileStore, JsonStore, MemoryStore, PersistentStore, StoreError};
}
