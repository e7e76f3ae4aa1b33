use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::quiz_state::QuizStateStore;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable string key-value storage port.
///
/// Each call is atomic with respect to the next one; there is a single writer.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. A missing key is `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every key in `keys` as one atomic step.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete; no key is removed then.
    async fn delete_all(&self, keys: &[&str]) -> Result<(), StorageError>;
}

/// Simple in-memory store for tests and throwaway sessions.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }

    async fn delete_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for key in keys {
            guard.remove(*key);
        }
        Ok(())
    }
}

/// Bundles the raw key-value backend with the quiz-state adapter built on it.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
    pub quiz_state: QuizStateStore,
}

impl Storage {
    #[must_use]
    pub fn from_kv(kv: Arc<dyn KeyValueStore>) -> Self {
        let quiz_state = QuizStateStore::new(Arc::clone(&kv));
        Self { kv, quiz_state }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_kv(Arc::new(InMemoryStore::new()))
    }
}
