use serde::{Deserialize, Serialize};

use crate::model::catalog::CatalogError;
use crate::model::ids::ChapterId;
use crate::model::question::{Question, QuestionDraft};

/// Raw chapter as it appears in a catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDraft {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

impl ChapterDraft {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        questions: Vec<QuestionDraft>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            questions,
        }
    }

    /// Validate the chapter and every question in it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for a blank id/title or the first invalid question.
    pub fn validate(self) -> Result<Chapter, CatalogError> {
        let id: ChapterId = self.id.parse().map_err(|_| CatalogError::EmptyChapterId)?;
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CatalogError::EmptyChapterTitle(id));
        }

        let mut questions = Vec::with_capacity(self.questions.len());
        for (position, draft) in self.questions.into_iter().enumerate() {
            let label = if draft.id.trim().is_empty() {
                format!("#{}", position + 1)
            } else {
                draft.id.trim().to_owned()
            };
            let question = draft.validate().map_err(|source| CatalogError::Question {
                chapter: id.clone(),
                question: label,
                source,
            })?;
            questions.push(question);
        }

        Ok(Chapter {
            id,
            title: title.to_owned(),
            questions,
        })
    }
}

/// An ordered group of questions. Order defines play order and grid position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    id: ChapterId,
    title: String,
    questions: Vec<Question>,
}

impl Chapter {
    #[must_use]
    pub fn id(&self) -> &ChapterId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::{QuestionError, QuestionKind};

    #[test]
    fn chapter_keeps_question_order_and_trims_title() {
        let chapter = ChapterDraft::new(
            "c1",
            "  Chapter One  ",
            vec![
                QuestionDraft::new("q2", QuestionKind::Single, "Second?", &["A. x"], &["A"]),
                QuestionDraft::new("q1", QuestionKind::Single, "First?", &["A. y"], &["A"]),
            ],
        )
        .validate()
        .unwrap();

        assert_eq!(chapter.title(), "Chapter One");
        let ids: Vec<_> = chapter.questions().iter().map(|q| q.id().as_str()).collect();
        assert_eq!(ids, vec!["q2", "q1"]);
    }

    #[test]
    fn chapter_reports_which_question_failed() {
        let err = ChapterDraft::new(
            "c1",
            "Chapter One",
            vec![QuestionDraft::new("bad", QuestionKind::Single, "?", &["A. x"], &["B"])],
        )
        .validate()
        .unwrap_err();

        match err {
            CatalogError::Question {
                chapter,
                question,
                source,
            } => {
                assert_eq!(chapter, ChapterId::new("c1"));
                assert_eq!(question, "bad");
                assert_eq!(source, QuestionError::UnknownAnswerKey("B".into()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn chapter_rejects_blank_title() {
        let err = ChapterDraft::new("c1", " ", Vec::new()).validate().unwrap_err();
        assert!(matches!(err, CatalogError::EmptyChapterTitle(_)));
    }
}
