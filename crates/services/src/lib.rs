#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod explanation_service;
pub mod sessions;

pub use app_services::AppServices;
pub use error::{AppServicesError, ExplainError, SessionError};
pub use explanation_service::{
    ExplainConfig, ExplanationService, Explainer, explain_or_placeholder,
};
pub use sessions::{
    Advance, ChapterOverview, GridCell, PendingAnswer, PendingReset, QuestionStatus, QuizMode,
    QuizStats, SessionController, SessionState, StoreSnapshot, SubmitOutcome, WrongSetChange,
};
