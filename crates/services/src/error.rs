//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::ChapterId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by an explanation provider.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExplainError {
    #[error("explanation service is not configured")]
    NotConfigured,
    #[error("explanation service returned an empty response")]
    EmptyResponse,
    #[error("explanation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ExplainError {
    /// Text shown in place of an explanation when generation fails.
    #[must_use]
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::NotConfigured => {
                "AI explanations are not configured. Set QUIZ_AI_API_KEY to enable them."
            }
            Self::EmptyResponse => "Sorry, no explanation is available right now.",
            Self::HttpStatus(_) | Self::Http(_) => {
                "Could not fetch an explanation. Check your network and try again later."
            }
        }
    }
}

/// Errors emitted by the session controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no quiz is in progress")]
    NoActiveSession,
    #[error("unknown chapter: {0}")]
    UnknownChapter(ChapterId),
    #[error("question is not part of the current chapter")]
    QuestionNotInSession,
    #[error("question index {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
