//! Answer evaluation.
//!
//! A submission is correct iff its key set equals the question's correct-key set.
//! The rule is the same for single- and multiple-selection questions; whether a
//! pick submits immediately is decided by the UI, not here.

use std::collections::BTreeSet;

use crate::model::{OptionKey, Question};

/// The set of option keys a player submitted. Duplicate picks collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission(BTreeSet<OptionKey>);

impl Submission {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a submission from raw key strings.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter().map(OptionKey::new).collect()
    }

    /// Flip the selection state of `key`. Returns true if it is now selected.
    pub fn toggle(&mut self, key: OptionKey) -> bool {
        if self.0.remove(&key) {
            false
        } else {
            self.0.insert(key);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, key: &OptionKey) -> bool {
        self.0.contains(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn keys(&self) -> &BTreeSet<OptionKey> {
        &self.0
    }
}

impl FromIterator<OptionKey> for Submission {
    fn from_iter<I: IntoIterator<Item = OptionKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl From<bool> for Verdict {
    fn from(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Incorrect }
    }
}

/// Decide whether `submission` answers `question` correctly.
#[must_use]
pub fn evaluate(question: &Question, submission: &Submission) -> Verdict {
    Verdict::from(question.correct_keys() == submission.keys())
}
