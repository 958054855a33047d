//! Typed wrapper with automatic JSON serialization.

use crate::{PersistentStore, StoreError};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// Type-safe view over a [`PersistentStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Clone)]
pub struct JsonStore {
    inner: Arc<dyn PersistentStore>,
}

impl JsonStore {
    /// Wrap a raw store.
    pub fn new(inner: Arc<dyn PersistentStore>) -> Self {
        Self { inner }
    }

    /// Get a value from the store.
    ///
    /// Returns `None` if the key doesn't exist, and an error if the stored
    /// text is not a valid `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.inner.read(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the store.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.inner.write(key, &raw)
    }
}

impl std::fmt::Debug for JsonStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStore").finish_non_exhaustive()
    }
}
