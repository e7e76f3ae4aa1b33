use quiz_core::model::{ChapterId, ProgressRecord, QuestionId, WrongSet};

/// Per-question status shown in the navigator grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionStatus {
    Correct,
    Wrong,
    Unanswered,
}

impl QuestionStatus {
    /// A flagged mistake wins over any recorded progress.
    #[must_use]
    pub fn resolve(id: &QuestionId, progress: &ProgressRecord, wrong: &WrongSet) -> Self {
        if wrong.contains(id) {
            Self::Wrong
        } else if progress.get(id) == Some(true) {
            Self::Correct
        } else {
            Self::Unanswered
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Wrong => "wrong",
            Self::Unanswered => "unanswered",
        }
    }
}

/// Aggregate counts for the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuizStats {
    pub total_questions: usize,
    pub completed: usize,
    pub wrong: usize,
}

/// One navigator cell of the active list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub position: usize,
    pub question_id: QuestionId,
    pub status: QuestionStatus,
    pub is_current: bool,
}

/// Chapter card data for the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterOverview {
    pub chapter_id: ChapterId,
    pub title: String,
    pub question_count: usize,
    pub wrong_count: usize,
}

impl ChapterOverview {
    #[must_use]
    pub fn has_mistakes(&self) -> bool {
        self.wrong_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_flag_takes_precedence() {
        let id = QuestionId::new("q1");
        let mut progress = ProgressRecord::new();
        progress.record(id.clone(), true);
        let wrong: WrongSet = [id.clone()].into_iter().collect();

        assert_eq!(QuestionStatus::resolve(&id, &progress, &wrong), QuestionStatus::Wrong);
        assert_eq!(
            QuestionStatus::resolve(&id, &progress, &WrongSet::new()),
            QuestionStatus::Correct
        );
    }

    #[test]
    fn recorded_false_without_flag_is_unanswered() {
        let id = QuestionId::new("q1");
        let mut progress = ProgressRecord::new();
        progress.record(id.clone(), false);

        assert_eq!(
            QuestionStatus::resolve(&id, &progress, &WrongSet::new()),
            QuestionStatus::Unanswered
        );
        assert_eq!(
            QuestionStatus::resolve(&QuestionId::new("q2"), &ProgressRecord::new(), &WrongSet::new()),
            QuestionStatus::Unanswered
        );
    }
}
