mod controller;
mod progress;
mod service;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{
    Advance, PendingAnswer, PendingReset, SessionController, SessionState, StoreSnapshot,
    SubmitOutcome, WrongSetChange,
};
pub use progress::{ChapterOverview, GridCell, QuestionStatus, QuizStats};
pub use service::{ParseQuizModeError, QuizMode, QuizSession};
