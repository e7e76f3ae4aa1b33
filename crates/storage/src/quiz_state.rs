//! Progress record and wrong set, persisted as two JSON entries in a key-value store.

use std::sync::Arc;

use quiz_core::model::{ProgressRecord, QuestionId, WrongSet};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::repository::{KeyValueStore, StorageError};

/// Key holding the `question id -> last correctness` object.
pub const PROGRESS_KEY: &str = "history_quiz_progress";
/// Key holding the `question id -> true` wrong-answer object.
pub const WRONG_KEY: &str = "history_quiz_wrong";

/// Adapter exposing quiz progress operations over a `KeyValueStore`.
///
/// Reads never fail: a missing, unreadable, or malformed entry is an empty mapping.
#[derive(Clone)]
pub struct QuizStateStore {
    kv: Arc<dyn KeyValueStore>,
}

impl QuizStateStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn read_progress(&self) -> ProgressRecord {
        self.read_json(PROGRESS_KEY).await
    }

    /// Upsert one progress entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated mapping cannot be written.
    pub async fn write_progress(&self, id: &QuestionId, correct: bool) -> Result<(), StorageError> {
        let mut progress = self.read_progress().await;
        progress.record(id.clone(), correct);
        self.write_json(PROGRESS_KEY, &progress).await
    }

    pub async fn read_wrong(&self) -> WrongSet {
        self.read_json(WRONG_KEY).await
    }

    /// Flag a question as wrong. Already-flagged questions are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated mapping cannot be written.
    pub async fn mark_wrong(&self, id: &QuestionId) -> Result<(), StorageError> {
        let mut wrong = self.read_wrong().await;
        if !wrong.insert(id.clone()) {
            return Ok(());
        }
        self.write_json(WRONG_KEY, &wrong).await
    }

    /// Remove a question from the wrong set; a no-op if it is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated mapping cannot be written.
    pub async fn clear_wrong(&self, id: &QuestionId) -> Result<(), StorageError> {
        let mut wrong = self.read_wrong().await;
        if !wrong.remove(id) {
            return Ok(());
        }
        self.write_json(WRONG_KEY, &wrong).await
    }

    /// Delete both progress and wrong set in one step.
    ///
    /// Destructive and irreversible: callers confirm with the user first and
    /// rebuild any in-memory session state afterward.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    pub async fn reset_all(&self) -> Result<(), StorageError> {
        self.kv.delete_all(&[PROGRESS_KEY, WRONG_KEY]).await
    }

    async fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.kv.get(key).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(key, error = %err, "stored entry is malformed, treating as empty");
                T::default()
            }),
            Ok(None) => T::default(),
            Err(err) => {
                warn!(key, error = %err, "store unreadable, treating as empty");
                T::default()
            }
        }
    }

    async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(key, &raw).await?;
        debug!(key, bytes = raw.len(), "stored quiz state");
        Ok(())
    }
}
