use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{OptionKey, QuestionId};

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Single,
    Multiple,
}

impl QuestionKind {
    #[must_use]
    pub fn is_single(self) -> bool {
        matches!(self, Self::Single)
    }
}

/// One selectable option, parsed from a `"KEY. text"` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOption {
    key: OptionKey,
    text: String,
}

impl QuestionOption {
    /// Parse an option string such as `"A. The Opium War"`.
    ///
    /// The key is everything before the first `.`, the text everything after it.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::MalformedOption` if there is no `.` separator or the key is blank.
    pub fn parse(raw: &str) -> Result<Self, QuestionError> {
        let Some((key, text)) = raw.split_once('.') else {
            return Err(QuestionError::MalformedOption(raw.to_owned()));
        };
        let key = OptionKey::new(key);
        if key.as_str().is_empty() {
            return Err(QuestionError::MalformedOption(raw.to_owned()));
        }
        Ok(Self {
            key,
            text: text.trim().to_owned(),
        })
    }

    #[must_use]
    pub fn key(&self) -> &OptionKey {
        &self.key
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Raw question as it appears in a catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: QuestionKind,
        prompt: impl Into<String>,
        options: &[&str],
        answer: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            prompt: prompt.into(),
            options: options.iter().map(|o| (*o).to_owned()).collect(),
            answer: answer.iter().map(|a| (*a).to_owned()).collect(),
            explanation: None,
        }
    }

    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if ids/prompt are blank, options are malformed or
    /// duplicated, or the correct-answer set does not fit the question kind and options.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id: QuestionId = self.id.parse().map_err(|_| QuestionError::EmptyId)?;

        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        if self.options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        let options = self
            .options
            .iter()
            .map(|raw| QuestionOption::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.key.clone()) {
                return Err(QuestionError::DuplicateOptionKey(option.key.to_string()));
            }
        }

        let correct: BTreeSet<OptionKey> = self
            .answer
            .iter()
            .map(OptionKey::new)
            .filter(|key| !key.as_str().is_empty())
            .collect();
        if correct.is_empty() {
            return Err(QuestionError::NoCorrectKeys);
        }
        if self.kind.is_single() && correct.len() != 1 {
            return Err(QuestionError::SingleChoiceKeyCount(correct.len()));
        }
        if let Some(unknown) = correct.iter().find(|key| !seen.contains(*key)) {
            return Err(QuestionError::UnknownAnswerKey(unknown.to_string()));
        }

        let explanation = self
            .explanation
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());

        Ok(Question {
            id,
            kind: self.kind,
            prompt: prompt.to_owned(),
            options,
            correct,
            explanation,
        })
    }
}

/// A validated multiple-choice question. Immutable after catalog load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    kind: QuestionKind,
    prompt: String,
    options: Vec<QuestionOption>,
    correct: BTreeSet<OptionKey>,
    explanation: Option<String>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    /// The set of keys that make up the correct answer.
    #[must_use]
    pub fn correct_keys(&self) -> &BTreeSet<OptionKey> {
        &self.correct
    }

    #[must_use]
    pub fn is_correct_key(&self, key: &OptionKey) -> bool {
        self.correct.contains(key)
    }

    /// Static explanation bundled with the catalog, if any.
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question id must not be blank")]
    EmptyId,

    #[error("question prompt must not be blank")]
    EmptyPrompt,

    #[error("question has no options")]
    NoOptions,

    #[error("malformed option {0:?}, expected \"KEY. text\"")]
    MalformedOption(String),

    #[error("option key {0} appears more than once")]
    DuplicateOptionKey(String),

    #[error("question has no correct answer keys")]
    NoCorrectKeys,

    #[error("single-choice question needs exactly one correct key, found {0}")]
    SingleChoiceKeyCount(usize),

    #[error("answer key {0} is not one of the options")]
    UnknownAnswerKey(String),
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
