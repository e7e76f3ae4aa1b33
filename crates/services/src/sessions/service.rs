use std::fmt;
use std::str::FromStr;

use quiz_core::model::{Chapter, Question, QuestionId, WrongSet};

use crate::error::SessionError;

/// How the active question list is derived from a chapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuizMode {
    /// Every question in the chapter; answers are recorded to progress.
    Practice,
    /// Only questions currently in the wrong set; progress is left alone.
    Review,
}

impl QuizMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Practice => "practice",
            Self::Review => "review",
        }
    }

    #[must_use]
    pub fn records_progress(self) -> bool {
        matches!(self, Self::Practice)
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseQuizModeError(String);

impl fmt::Display for ParseQuizModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown quiz mode: {}", self.0)
    }
}

impl std::error::Error for ParseQuizModeError {}

impl FromStr for QuizMode {
    type Err = ParseQuizModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "practice" => Ok(Self::Practice),
            "review" => Ok(Self::Review),
            other => Err(ParseQuizModeError(other.to_owned())),
        }
    }
}

/// Result of moving past the current question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Next(usize),
    Finished,
}

/// Position state of one chapter run.
///
/// The active list is never stored: it is derived from the chapter, the mode and
/// the live wrong set on every call. A question answered correctly in review mode
/// leaves the wrong set immediately; the session pins it as the current question
/// until the player navigates away, while the list itself only holds what is
/// still flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    chapter: Chapter,
    mode: QuizMode,
    index: usize,
    pinned: Option<QuestionId>,
}

impl QuizSession {
    #[must_use]
    pub fn new(chapter: Chapter, mode: QuizMode) -> Self {
        Self {
            chapter,
            mode,
            index: 0,
            pinned: None,
        }
    }

    #[must_use]
    pub fn chapter(&self) -> &Chapter {
        &self.chapter
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Look up a question of this session's chapter, whether or not it is active.
    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.chapter.questions().iter().find(|q| q.id() == id)
    }

    fn is_active(&self, question: &Question, wrong: &WrongSet) -> bool {
        match self.mode {
            QuizMode::Practice => true,
            QuizMode::Review => wrong.contains(question.id()),
        }
    }

    #[must_use]
    pub fn active_questions(&self, wrong: &WrongSet) -> Vec<&Question> {
        self.chapter
            .questions()
            .iter()
            .filter(|q| self.is_active(q, wrong))
            .collect()
    }

    #[must_use]
    pub fn active_len(&self, wrong: &WrongSet) -> usize {
        self.chapter
            .questions()
            .iter()
            .filter(|q| self.is_active(q, wrong))
            .count()
    }

    /// The pinned question if there is one, else the question at the index.
    #[must_use]
    pub fn current_question(&self, wrong: &WrongSet) -> Option<&Question> {
        match &self.pinned {
            Some(id) => self.question(id),
            None => self.active_questions(wrong).get(self.index).copied(),
        }
    }

    /// True while the current question is pinned but has left the active list.
    #[must_use]
    pub fn holds_answered(&self, wrong: &WrongSet) -> bool {
        self.pinned
            .as_ref()
            .and_then(|id| self.question(id))
            .is_some_and(|question| !self.is_active(question, wrong))
    }

    /// Keep `id` visible until the next navigation if it is the current question.
    pub fn pin_if_current(&mut self, id: &QuestionId, wrong: &WrongSet) {
        let is_current = self
            .current_question(wrong)
            .is_some_and(|question| question.id() == id);
        if is_current {
            self.pinned = Some(id.clone());
        }
    }

    // A held question's successor already sits at the current index.
    fn next_index(&self, wrong: &WrongSet) -> usize {
        if self.holds_answered(wrong) {
            self.index
        } else {
            self.index + 1
        }
    }

    /// True if `advance` would end the session.
    #[must_use]
    pub fn is_last(&self, wrong: &WrongSet) -> bool {
        self.next_index(wrong) >= self.active_len(wrong)
    }

    /// Move to the next question of the live list.
    pub fn advance(&mut self, wrong: &WrongSet) -> Step {
        let next = self.next_index(wrong);
        self.pinned = None;
        if next < self.active_len(wrong) {
            self.index = next;
            Step::Next(next)
        } else {
            Step::Finished
        }
    }

    /// Jump to a position of the live list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` and leaves the position unchanged when
    /// `index` is not below the active list length.
    pub fn jump_to(&mut self, index: usize, wrong: &WrongSet) -> Result<usize, SessionError> {
        let len = self.active_len(wrong);
        if index >= len {
            return Err(SessionError::IndexOutOfRange { index, len });
        }
        self.pinned = None;
        self.index = index;
        Ok(index)
    }

    /// Keep the index on `id` after the wrong set changed underneath the session.
    ///
    /// A question that is no longer listed leaves the index alone.
    pub fn follow(&mut self, id: &QuestionId, wrong: &WrongSet) {
        if let Some(position) = self
            .active_questions(wrong)
            .iter()
            .position(|q| q.id() == id)
        {
            self.index = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{ChapterDraft, QuestionDraft, QuestionKind};

    fn chapter() -> Chapter {
        let questions = (1..=4)
            .map(|n| {
                QuestionDraft::new(
                    format!("q{n}"),
                    QuestionKind::Single,
                    format!("Question {n}"),
                    &["A. yes", "B. no"],
                    &["A"],
                )
            })
            .collect();
        ChapterDraft::new("c1", "Chapter", questions).validate().unwrap()
    }

    fn wrong(ids: &[&str]) -> WrongSet {
        ids.iter().map(|id| QuestionId::new(*id)).collect()
    }

    fn ids(questions: &[&Question]) -> Vec<String> {
        questions.iter().map(|q| q.id().to_string()).collect()
    }

    #[test]
    fn mode_parses_and_displays() {
        assert_eq!("practice".parse::<QuizMode>().unwrap(), QuizMode::Practice);
        assert_eq!("review".parse::<QuizMode>().unwrap(), QuizMode::Review);
        assert!("quiz".parse::<QuizMode>().is_err());
        assert_eq!(QuizMode::Review.to_string(), "review");
    }

    #[test]
    fn practice_lists_every_question_in_order() {
        let session = QuizSession::new(chapter(), QuizMode::Practice);
        let active = session.active_questions(&wrong(&["q3"]));
        assert_eq!(ids(&active), vec!["q1", "q2", "q3", "q4"]);
    }

    #[test]
    fn review_lists_only_wrong_questions() {
        let session = QuizSession::new(chapter(), QuizMode::Review);
        let active = session.active_questions(&wrong(&["q4", "q2", "elsewhere"]));
        assert_eq!(ids(&active), vec!["q2", "q4"]);
        assert_eq!(session.active_len(&WrongSet::new()), 0);
    }

    #[test]
    fn advance_walks_to_the_end() {
        let mut session = QuizSession::new(chapter(), QuizMode::Practice);
        let w = WrongSet::new();
        assert_eq!(session.advance(&w), Step::Next(1));
        assert_eq!(session.advance(&w), Step::Next(2));
        assert_eq!(session.advance(&w), Step::Next(3));
        assert_eq!(session.advance(&w), Step::Finished);
        assert_eq!(session.index(), 3);
    }

    #[test]
    fn pinned_review_question_stays_current_until_advance() {
        let mut session = QuizSession::new(chapter(), QuizMode::Review);
        let before = wrong(&["q1", "q3"]);
        session.pin_if_current(&QuestionId::new("q1"), &before);

        // q1 was answered correctly and left the wrong set.
        let after = wrong(&["q3"]);
        assert_eq!(ids(&session.active_questions(&after)), vec!["q3"]);
        assert_eq!(session.active_len(&after), 1);
        assert_eq!(session.current_question(&after).unwrap().id().as_str(), "q1");
        assert!(session.holds_answered(&after));
        assert!(!session.is_last(&after));

        assert_eq!(session.advance(&after), Step::Next(0));
        assert_eq!(session.current_question(&after).unwrap().id().as_str(), "q3");
        assert!(!session.holds_answered(&after));
        assert!(session.is_last(&after));
    }

    #[test]
    fn pinned_last_review_question_finishes_on_advance() {
        let mut session = QuizSession::new(chapter(), QuizMode::Review);
        session.pin_if_current(&QuestionId::new("q2"), &wrong(&["q2"]));
        assert_eq!(session.advance(&WrongSet::new()), Step::Finished);
    }

    #[test]
    fn pin_ignores_questions_other_than_current() {
        let mut session = QuizSession::new(chapter(), QuizMode::Review);
        session.pin_if_current(&QuestionId::new("q3"), &wrong(&["q1", "q3"]));
        let after = wrong(&["q1"]);
        assert_eq!(session.current_question(&after).unwrap().id().as_str(), "q1");
        assert!(!session.holds_answered(&after));
    }

    #[test]
    fn jump_out_of_range_keeps_index() {
        let mut session = QuizSession::new(chapter(), QuizMode::Review);
        let w = wrong(&["q1", "q2", "q3"]);
        session.jump_to(1, &w).unwrap();

        let err = session.jump_to(5, &w).unwrap_err();
        assert!(matches!(err, SessionError::IndexOutOfRange { index: 5, len: 3 }));
        assert_eq!(session.index(), 1);
    }

    #[test]
    fn jump_after_pinned_removal_lands_on_clicked_question() {
        let mut session = QuizSession::new(chapter(), QuizMode::Review);
        session.pin_if_current(&QuestionId::new("q1"), &wrong(&["q1", "q2", "q4"]));
        let after = wrong(&["q2", "q4"]);

        // Grid shows the live list [q2, q4]; clicking the second cell means q4.
        assert_eq!(session.jump_to(1, &after).unwrap(), 1);
        assert_eq!(session.current_question(&after).unwrap().id().as_str(), "q4");
        assert!(matches!(
            session.jump_to(2, &after),
            Err(SessionError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn follow_keeps_the_current_question_when_the_list_shrinks() {
        let mut session = QuizSession::new(chapter(), QuizMode::Review);
        let before = wrong(&["q1", "q2", "q4"]);
        session.jump_to(2, &before).unwrap();

        let after = wrong(&["q2", "q4"]);
        session.follow(&QuestionId::new("q4"), &after);
        assert_eq!(session.index(), 1);
        assert_eq!(session.current_question(&after).unwrap().id().as_str(), "q4");
    }
}
