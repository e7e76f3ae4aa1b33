#![forbid(unsafe_code)]

pub mod quiz_state;
pub mod repository;
pub mod sqlite;

pub use quiz_state::{PROGRESS_KEY, QuizStateStore, WRONG_KEY};
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
