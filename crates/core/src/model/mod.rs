mod catalog;
mod chapter;
mod ids;
mod progress;
mod question;

pub use catalog::{Catalog, CatalogError};
pub use chapter::{Chapter, ChapterDraft};
pub use ids::{ChapterId, OptionKey, ParseIdError, QuestionId};
pub use progress::{ProgressRecord, WrongSet};
pub use question::{Question, QuestionDraft, QuestionError, QuestionKind, QuestionOption};
