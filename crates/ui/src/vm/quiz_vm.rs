use std::collections::BTreeSet;

use quiz_core::model::{OptionKey, Question, QuestionKind};
use quiz_core::{Submission, Verdict};
use services::{GridCell, QuestionStatus, QuizMode};

/// Visual state of one option button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMark {
    Idle,
    Selected,
    /// Part of the answer, shown after submission.
    Correct,
    /// Picked but not part of the answer.
    WrongPick,
    /// Neither picked nor correct, after submission.
    Dimmed,
}

impl OptionMark {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Idle => "quiz-option",
            Self::Selected => "quiz-option quiz-option--selected",
            Self::Correct => "quiz-option quiz-option--correct",
            Self::WrongPick => "quiz-option quiz-option--wrong",
            Self::Dimmed => "quiz-option quiz-option--dimmed",
        }
    }

    #[must_use]
    pub fn icon(self) -> Option<&'static str> {
        match self {
            Self::Correct => Some("✓"),
            Self::WrongPick => Some("✗"),
            _ => None,
        }
    }
}

#[must_use]
pub fn option_mark(key: &OptionKey, question: &Question, picked: &Submission, submitted: bool) -> OptionMark {
    let selected = picked.contains(key);
    if !submitted {
        return if selected {
            OptionMark::Selected
        } else {
            OptionMark::Idle
        };
    }
    if question.is_correct_key(key) {
        OptionMark::Correct
    } else if selected {
        OptionMark::WrongPick
    } else {
        OptionMark::Dimmed
    }
}

#[must_use]
pub fn kind_badge(kind: QuestionKind) -> (&'static str, &'static str) {
    match kind {
        QuestionKind::Single => ("Single choice", "badge badge--single"),
        QuestionKind::Multiple => ("Multiple choice", "badge badge--multiple"),
    }
}

#[must_use]
pub fn answer_label(keys: &BTreeSet<OptionKey>) -> String {
    keys.iter()
        .map(OptionKey::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Verdict banner: heading plus the correct keys when the answer was wrong.
#[must_use]
pub fn verdict_banner(verdict: Verdict, correct_keys: &BTreeSet<OptionKey>) -> (&'static str, Option<String>) {
    match verdict {
        Verdict::Correct => ("Correct!", None),
        Verdict::Incorrect => (
            "Incorrect",
            Some(format!("The correct answer is {}", answer_label(correct_keys))),
        ),
    }
}

#[must_use]
pub fn counter_label(index: usize, len: usize) -> String {
    format!("{}/{len}", index + 1)
}

#[must_use]
pub fn progress_percent(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    ((index + 1) * 100 / len).min(100)
}

#[must_use]
pub fn footer_hint(mode: QuizMode) -> &'static str {
    match mode {
        QuizMode::Practice => "Wrong answers are added to your mistakes list",
        QuizMode::Review => "Correct answers leave your mistakes list",
    }
}

#[must_use]
pub fn next_label(is_last: bool) -> &'static str {
    if is_last { "Finish" } else { "Next" }
}

#[must_use]
pub fn grid_cell_class(cell: &GridCell) -> &'static str {
    if cell.is_current {
        return "grid-cell grid-cell--current";
    }
    match cell.status {
        QuestionStatus::Correct => "grid-cell grid-cell--correct",
        QuestionStatus::Wrong => "grid-cell grid-cell--wrong",
        QuestionStatus::Unanswered => "grid-cell",
    }
}
