use std::collections::BTreeSet;
use std::sync::Arc;

use quiz_core::model::{
    Catalog, Chapter, ChapterId, OptionKey, ProgressRecord, Question, QuestionId, WrongSet,
};
use quiz_core::{Submission, Verdict, evaluate};
use storage::QuizStateStore;
use storage::repository::StorageError;
use tracing::{debug, info, warn};

use super::progress::{ChapterOverview, GridCell, QuestionStatus, QuizStats};
use super::service::{QuizMode, QuizSession, Step};
use crate::error::SessionError;

/// Where the controller currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Home,
    Active(QuizSession),
}

/// How a submission changed the wrong set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrongSetChange {
    Added,
    Removed,
    Unchanged,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub verdict: Verdict,
    pub correct_keys: BTreeSet<OptionKey>,
    pub progress_recorded: bool,
    pub wrong_set_change: WrongSetChange,
}

/// Result of `SessionController::advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next(usize),
    /// The last question was passed; the controller is back at `Home`.
    Finished { chapter_id: ChapterId, mode: QuizMode },
}

/// Both persisted mappings as read from the store at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub progress: ProgressRecord,
    pub wrong: WrongSet,
}

impl StoreSnapshot {
    pub async fn load(store: &QuizStateStore) -> Self {
        Self {
            progress: store.read_progress().await,
            wrong: store.read_wrong().await,
        }
    }
}

/// An evaluated answer whose store writes have not run yet.
///
/// Produced by `SessionController::answer`. `persist` needs no access to the
/// controller, so the caller can keep handling navigation while it runs and then
/// hand the returned snapshot to `SessionController::apply_snapshot`.
#[derive(Clone)]
pub struct PendingAnswer {
    store: QuizStateStore,
    question_id: QuestionId,
    mode: QuizMode,
    verdict: Verdict,
    correct_keys: BTreeSet<OptionKey>,
    was_wrong: bool,
}

impl PendingAnswer {
    /// Write progress and the wrong flag, then re-read the store.
    ///
    /// The snapshot is returned even when a write fails.
    pub async fn persist(self) -> (Result<SubmitOutcome, SessionError>, StoreSnapshot) {
        let written = self.write().await.inspect_err(|err| {
            warn!(question = %self.question_id, error = %err, "failed to persist answer");
        });
        let snapshot = StoreSnapshot::load(&self.store).await;
        let result = written.map_err(SessionError::from).map(|wrong_set_change| {
            debug!(
                question = %self.question_id,
                verdict = ?self.verdict,
                mode = %self.mode,
                "answer recorded"
            );
            SubmitOutcome {
                verdict: self.verdict,
                correct_keys: self.correct_keys.clone(),
                progress_recorded: self.mode.records_progress(),
                wrong_set_change,
            }
        });
        (result, snapshot)
    }

    async fn write(&self) -> Result<WrongSetChange, StorageError> {
        let id = &self.question_id;
        if self.mode.records_progress() {
            self.store.write_progress(id, self.verdict.is_correct()).await?;
        }
        match self.verdict {
            Verdict::Correct if self.was_wrong => {
                self.store.clear_wrong(id).await?;
                Ok(WrongSetChange::Removed)
            }
            Verdict::Correct => Ok(WrongSetChange::Unchanged),
            Verdict::Incorrect => {
                self.store.mark_wrong(id).await?;
                if self.was_wrong {
                    Ok(WrongSetChange::Unchanged)
                } else {
                    Ok(WrongSetChange::Added)
                }
            }
        }
    }
}

/// A full wipe of the store, detached from the controller like `PendingAnswer`.
#[derive(Clone)]
pub struct PendingReset {
    store: QuizStateStore,
}

impl PendingReset {
    pub async fn run(self) -> (Result<(), SessionError>, StoreSnapshot) {
        let result = self.store.reset_all().await.inspect_err(|err| {
            warn!(error = %err, "reset failed");
        });
        let snapshot = StoreSnapshot::load(&self.store).await;
        if result.is_ok() {
            info!("all quiz data reset");
        }
        (result.map_err(SessionError::from), snapshot)
    }
}

/// Drives one player through chapters and keeps the persisted quiz state in step.
///
/// The controller caches the progress record and wrong set and re-reads both after
/// every mutation, so accessors always reflect what the store holds.
#[derive(Clone)]
pub struct SessionController {
    catalog: Arc<Catalog>,
    store: QuizStateStore,
    progress: ProgressRecord,
    wrong: WrongSet,
    state: SessionState,
}

impl SessionController {
    /// Build a controller at `Home` with snapshots loaded from `store`.
    pub async fn new(catalog: Arc<Catalog>, store: QuizStateStore) -> Self {
        let StoreSnapshot { progress, wrong } = StoreSnapshot::load(&store).await;
        Self {
            catalog,
            store,
            progress,
            wrong,
            state: SessionState::Home,
        }
    }

    /// Replace the cached mappings, keeping the active session on its current question.
    pub fn apply_snapshot(&mut self, snapshot: StoreSnapshot) {
        let current = self.current_question().map(|q| q.id().clone());
        self.progress = snapshot.progress;
        self.wrong = snapshot.wrong;
        if let (SessionState::Active(session), Some(id)) = (&mut self.state, current) {
            session.follow(&id, &self.wrong);
        }
    }

    /// Enter a chapter in the given mode at index 0.
    ///
    /// An empty review list is a valid session; check `is_empty_review`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownChapter` if the catalog has no such chapter.
    pub fn select_chapter(
        &mut self,
        chapter_id: &ChapterId,
        mode: QuizMode,
    ) -> Result<usize, SessionError> {
        let chapter = self
            .catalog
            .chapter(chapter_id)
            .ok_or_else(|| SessionError::UnknownChapter(chapter_id.clone()))?;
        let session = QuizSession::new(chapter.clone(), mode);
        let len = session.active_len(&self.wrong);
        info!(chapter = %chapter_id, %mode, questions = len, "quiz started");
        self.state = SessionState::Active(session);
        Ok(len)
    }

    /// Evaluate an answer and pin its question; the store writes are returned
    /// as a `PendingAnswer`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` at `Home` and
    /// `SessionError::QuestionNotInSession` for a question of another chapter.
    pub fn answer(
        &mut self,
        question_id: &QuestionId,
        submission: &Submission,
    ) -> Result<PendingAnswer, SessionError> {
        let SessionState::Active(session) = &mut self.state else {
            return Err(SessionError::NoActiveSession);
        };
        let (verdict, correct_keys) = {
            let question = session
                .question(question_id)
                .ok_or(SessionError::QuestionNotInSession)?;
            (evaluate(question, submission), question.correct_keys().clone())
        };
        session.pin_if_current(question_id, &self.wrong);
        Ok(PendingAnswer {
            store: self.store.clone(),
            question_id: question_id.clone(),
            mode: session.mode(),
            verdict,
            correct_keys,
            was_wrong: self.wrong.contains(question_id),
        })
    }

    /// Evaluate and persist an answer.
    ///
    /// Practice answers always write progress. In either mode a correct answer
    /// clears a wrong flag and an incorrect one sets it.
    ///
    /// # Errors
    ///
    /// Returns the errors of `answer`, and `SessionError::Storage` if a write fails.
    /// The cached mappings are re-read from the store either way.
    pub async fn submit(
        &mut self,
        question_id: &QuestionId,
        submission: &Submission,
    ) -> Result<SubmitOutcome, SessionError> {
        let pending = self.answer(question_id, submission)?;
        let (result, snapshot) = pending.persist().await;
        self.apply_snapshot(snapshot);
        result
    }

    /// Move to the next question, or back to `Home` after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` at `Home`.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        let SessionState::Active(session) = &mut self.state else {
            return Err(SessionError::NoActiveSession);
        };
        match session.advance(&self.wrong) {
            Step::Next(index) => Ok(Advance::Next(index)),
            Step::Finished => {
                let chapter_id = session.chapter().id().clone();
                let mode = session.mode();
                info!(chapter = %chapter_id, %mode, "quiz finished");
                self.state = SessionState::Home;
                Ok(Advance::Finished { chapter_id, mode })
            }
        }
    }

    /// Jump to a position of the active list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` at `Home` and
    /// `SessionError::IndexOutOfRange` for a position past the list end.
    pub fn jump_to(&mut self, index: usize) -> Result<usize, SessionError> {
        let SessionState::Active(session) = &mut self.state else {
            return Err(SessionError::NoActiveSession);
        };
        session.jump_to(index, &self.wrong)
    }

    /// Leave the current chapter without finishing it.
    pub fn abandon(&mut self) {
        if let SessionState::Active(session) = &self.state {
            info!(chapter = %session.chapter().id(), "quiz abandoned");
        }
        self.state = SessionState::Home;
    }

    /// Return to `Home` and hand back the store wipe as a `PendingReset`.
    pub fn start_reset(&mut self) -> PendingReset {
        self.state = SessionState::Home;
        PendingReset {
            store: self.store.clone(),
        }
    }

    /// Erase all persisted progress and mistakes and return to `Home`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store rejects the delete. The
    /// controller is still back at `Home` with freshly read snapshots.
    pub async fn reset_all(&mut self) -> Result<(), SessionError> {
        let (result, snapshot) = self.start_reset().run().await;
        self.apply_snapshot(snapshot);
        result
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_home(&self) -> bool {
        matches!(self.state, SessionState::Home)
    }

    fn session(&self) -> Option<&QuizSession> {
        match &self.state {
            SessionState::Home => None,
            SessionState::Active(session) => Some(session),
        }
    }

    #[must_use]
    pub fn mode(&self) -> Option<QuizMode> {
        self.session().map(QuizSession::mode)
    }

    #[must_use]
    pub fn chapter(&self) -> Option<&Chapter> {
        self.session().map(QuizSession::chapter)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session()
            .and_then(|session| session.current_question(&self.wrong))
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.session().map(QuizSession::index)
    }

    #[must_use]
    pub fn active_len(&self) -> usize {
        self.session()
            .map_or(0, |session| session.active_len(&self.wrong))
    }

    #[must_use]
    pub fn active_questions(&self) -> Vec<&Question> {
        self.session()
            .map(|session| session.active_questions(&self.wrong))
            .unwrap_or_default()
    }

    /// True for a review session with no flagged mistakes and nothing held on screen.
    #[must_use]
    pub fn is_empty_review(&self) -> bool {
        self.session().is_some_and(|session| {
            session.mode() == QuizMode::Review
                && session.active_len(&self.wrong) == 0
                && session.current_question(&self.wrong).is_none()
        })
    }

    /// True while an answered review question stays on screen after leaving the list.
    #[must_use]
    pub fn holds_answered(&self) -> bool {
        self.session()
            .is_some_and(|session| session.holds_answered(&self.wrong))
    }

    /// True if `advance` would finish the session.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.session()
            .is_none_or(|session| session.is_last(&self.wrong))
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressRecord {
        &self.progress
    }

    #[must_use]
    pub fn wrong_set(&self) -> &WrongSet {
        &self.wrong
    }

    #[must_use]
    pub fn question_status(&self, id: &QuestionId) -> QuestionStatus {
        QuestionStatus::resolve(id, &self.progress, &self.wrong)
    }

    /// Navigator cells for the active list in play order.
    #[must_use]
    pub fn grid(&self) -> Vec<GridCell> {
        let current = self.current_question().map(Question::id);
        self.active_questions()
            .into_iter()
            .enumerate()
            .map(|(position, question)| GridCell {
                position,
                question_id: question.id().clone(),
                status: self.question_status(question.id()),
                is_current: current == Some(question.id()),
            })
            .collect()
    }

    #[must_use]
    pub fn stats(&self) -> QuizStats {
        QuizStats {
            total_questions: self.catalog.total_question_count(),
            completed: self.progress.completed_count(),
            wrong: self.wrong.len(),
        }
    }

    /// Flagged mistakes among the questions of one chapter.
    #[must_use]
    pub fn chapter_wrong_count(&self, chapter_id: &ChapterId) -> usize {
        self.catalog.chapter(chapter_id).map_or(0, |chapter| {
            chapter
                .questions()
                .iter()
                .filter(|q| self.wrong.contains(q.id()))
                .count()
        })
    }

    #[must_use]
    pub fn chapter_overviews(&self) -> Vec<ChapterOverview> {
        self.catalog
            .chapters()
            .iter()
            .map(|chapter| ChapterOverview {
                chapter_id: chapter.id().clone(),
                title: chapter.title().to_owned(),
                question_count: chapter.len(),
                wrong_count: self.chapter_wrong_count(chapter.id()),
            })
            .collect()
    }
}
