use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::ids::QuestionId;

/// Question id -> "was the last practice answer correct".
///
/// Serialized as a flat JSON object, e.g. `{"q1": true, "q2": false}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressRecord(BTreeMap<QuestionId, bool>);

impl ProgressRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the correctness flag for one question.
    pub fn record(&mut self, id: QuestionId, correct: bool) {
        self.0.insert(id, correct);
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<bool> {
        self.0.get(id).copied()
    }

    /// Number of questions answered at least once in practice.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, bool)> {
        self.0.iter().map(|(id, correct)| (id, *correct))
    }
}

/// Questions currently flagged as unresolved mistakes.
///
/// Persisted as `{"q2": true}`; entries with `false` are ignored on read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrongSet(BTreeSet<QuestionId>);

impl WrongSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the id was not already present.
    pub fn insert(&mut self, id: QuestionId) -> bool {
        self.0.insert(id)
    }

    /// Returns true if the id was present.
    pub fn remove(&mut self, id: &QuestionId) -> bool {
        self.0.remove(id)
    }

    #[must_use]
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.0.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionId> {
        self.0.iter()
    }
}

impl FromIterator<QuestionId> for WrongSet {
    fn from_iter<I: IntoIterator<Item = QuestionId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for WrongSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|id| (id, true)))
    }
}

impl<'de> Deserialize<'de> for WrongSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let flags = BTreeMap::<QuestionId, bool>::deserialize(deserializer)?;
        Ok(flags
            .into_iter()
            .filter_map(|(id, flagged)| flagged.then_some(id))
            .collect())
    }
}
