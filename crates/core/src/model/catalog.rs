use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::chapter::{Chapter, ChapterDraft};
use crate::model::ids::{ChapterId, QuestionId};
use crate::model::question::{Question, QuestionError};

/// Top-level catalog document: either `{ "chapters": [...] }` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Wrapped { chapters: Vec<ChapterDraft> },
    Bare(Vec<ChapterDraft>),
}

/// The read-only question bank, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    chapters: Vec<Chapter>,
    // question id -> (chapter position, question position)
    index: HashMap<QuestionId, (usize, usize)>,
}

impl Catalog {
    /// Build a catalog from already-deserialized drafts.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for invalid chapters/questions or duplicate ids.
    pub fn from_drafts(drafts: Vec<ChapterDraft>) -> Result<Self, CatalogError> {
        let mut chapters = Vec::with_capacity(drafts.len());
        let mut chapter_ids = HashSet::with_capacity(drafts.len());
        let mut index = HashMap::new();

        for (chapter_pos, draft) in drafts.into_iter().enumerate() {
            let chapter = draft.validate()?;
            if !chapter_ids.insert(chapter.id().clone()) {
                return Err(CatalogError::DuplicateChapterId(chapter.id().clone()));
            }
            for (question_pos, question) in chapter.questions().iter().enumerate() {
                if index
                    .insert(question.id().clone(), (chapter_pos, question_pos))
                    .is_some()
                {
                    return Err(CatalogError::DuplicateQuestionId(question.id().clone()));
                }
            }
            chapters.push(chapter);
        }

        Ok(Self { chapters, index })
    }

    /// Parse and validate a JSON catalog document.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Json` for malformed JSON, or any validation error.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let drafts = match document {
            CatalogDocument::Wrapped { chapters } | CatalogDocument::Bare(chapters) => chapters,
        };
        Self::from_drafts(drafts)
    }

    /// Read a JSON catalog from disk.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, or any parse/validation error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Number of questions across all chapters.
    #[must_use]
    pub fn total_question_count(&self) -> usize {
        self.chapters.iter().map(Chapter::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    #[must_use]
    pub fn chapter(&self, id: &ChapterId) -> Option<&Chapter> {
        self.chapters.iter().find(|chapter| chapter.id() == id)
    }

    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        let &(chapter_pos, question_pos) = self.index.get(id)?;
        self.chapters
            .get(chapter_pos)
            .and_then(|chapter| chapter.questions().get(question_pos))
    }

    /// The chapter that owns the given question.
    #[must_use]
    pub fn chapter_of(&self, id: &QuestionId) -> Option<&Chapter> {
        let &(chapter_pos, _) = self.index.get(id)?;
        self.chapters.get(chapter_pos)
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("chapter id must not be blank")]
    EmptyChapterId,

    #[error("chapter {0} has a blank title")]
    EmptyChapterTitle(ChapterId),

    #[error("chapter id {0} appears more than once")]
    DuplicateChapterId(ChapterId),

    #[error("question id {0} appears more than once")]
    DuplicateQuestionId(QuestionId),

    #[error("invalid question {question} in chapter {chapter}: {source}")]
    Question {
        chapter: ChapterId,
        question: String,
        #[source]
        source: QuestionError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "chapters": [
            {
                "id": "c1",
                "title": "The Opium Wars",
                "questions": [
                    { "id": "q1", "type": "single", "question": "Start year?", "options": ["A. 1839", "B. 1840"], "answer": ["B"] },
                    { "id": "q2", "type": "multiple", "question": "Treaty ports?", "options": ["A. Canton", "B. Beijing", "C. Ningbo"], "answer": ["A", "C"] }
                ]
            },
            {
                "id": "c2",
                "title": "Self-Strengthening",
                "questions": [
                    { "id": "q3", "type": "single", "question": "Slogan?", "options": ["A. Learn from the West", "B. Other"], "answer": ["A"] }
                ]
            }
        ]
    }"#;

    #[test]
    fn loads_wrapped_document() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.chapters().len(), 2);
        assert_eq!(catalog.total_question_count(), 3);

        let q3 = catalog.question(&QuestionId::new("q3")).unwrap();
        assert_eq!(q3.prompt(), "Slogan?");
        let owner = catalog.chapter_of(&QuestionId::new("q2")).unwrap();
        assert_eq!(owner.id(), &ChapterId::new("c1"));
        assert!(catalog.chapter(&ChapterId::new("c9")).is_none());
    }

    #[test]
    fn loads_bare_array_document() {
        let json = r#"[{ "id": "c1", "title": "Only", "questions": [] }]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.chapters().len(), 1);
        assert_eq!(catalog.total_question_count(), 0);
    }

    #[test]
    fn rejects_question_ids_duplicated_across_chapters() {
        let json = r#"[
            { "id": "c1", "title": "One", "questions": [
                { "id": "q1", "type": "single", "question": "?", "options": ["A. x"], "answer": ["A"] }
            ]},
            { "id": "c2", "title": "Two", "questions": [
                { "id": "q1", "type": "single", "question": "?", "options": ["A. x"], "answer": ["A"] }
            ]}
        ]"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateQuestionId(id) if id.as_str() == "q1"));
    }

    #[test]
    fn rejects_duplicate_chapter_ids() {
        let json = r#"[
            { "id": "c1", "title": "One" },
            { "id": "c1", "title": "Again" }
        ]"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateChapterId(_)));
    }

    #[test]
    fn malformed_json_is_a_typed_error() {
        let err = Catalog::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Catalog::load("/definitely/not/here/catalog.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
