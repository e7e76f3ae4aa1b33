mod navigator;
mod question_card;
mod view;

pub use view::QuizView;

#[cfg(test)]
pub(crate) use question_card::QuestionCardTestHandles;
