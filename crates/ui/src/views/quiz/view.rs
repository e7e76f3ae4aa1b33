use dioxus::prelude::*;
use dioxus_router::use_navigator;
use quiz_core::Submission;
use quiz_core::model::{Question, QuestionId};
use services::{Advance, GridCell, QuizMode};
use tracing::warn;

use super::navigator::NavigatorGrid;
use super::question_card::QuestionCard;
use crate::context::use_quiz;
use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::{counter_label, footer_hint, next_label, progress_percent};

/// Chapter that was just played to the end.
#[derive(Clone, Debug, PartialEq, Eq)]
struct FinishedQuiz {
    title: String,
    mode: QuizMode,
}

/// Everything the active quiz screen renders, read from the controller in one go.
#[derive(Clone, Debug, PartialEq)]
enum QuizScreen {
    NoSession,
    EmptyReview { title: String },
    Playing(PlayingData),
}

#[derive(Clone, Debug, PartialEq)]
struct PlayingData {
    title: String,
    mode: QuizMode,
    index: usize,
    /// Questions still listed, plus the answered one held on screen.
    len: usize,
    is_last: bool,
    grid: Vec<GridCell>,
    question: Question,
}

#[component]
pub fn QuizView() -> Element {
    let quiz = use_quiz();
    let navigator = use_navigator();
    let mut controller = quiz.controller;
    let mut grid_open = use_signal(|| false);
    let mut finished = use_signal(|| None::<FinishedQuiz>);
    let mut saving = use_signal(|| false);
    let mut error = use_signal(|| None::<ViewError>);

    let screen = {
        let ctl = controller.read();
        let title = ctl
            .chapter()
            .map(|chapter| chapter.title().to_string())
            .unwrap_or_default();
        match (ctl.mode(), ctl.current_index(), ctl.current_question()) {
            (None, _, _) => QuizScreen::NoSession,
            (Some(_), _, _) if ctl.is_empty_review() => QuizScreen::EmptyReview { title },
            (Some(mode), Some(index), Some(question)) => QuizScreen::Playing(PlayingData {
                title,
                mode,
                index,
                len: ctl.active_len() + usize::from(ctl.holds_answered()),
                is_last: ctl.is_last(),
                grid: ctl.grid(),
                question: question.clone(),
            }),
            (Some(_), _, _) => QuizScreen::NoSession,
        }
    };

    let on_submit = use_callback(move |(question_id, submission): (QuestionId, Submission)| {
        // Only the store write is awaited; navigation stays live meanwhile.
        let pending = controller.write().answer(&question_id, &submission);
        let pending = match pending {
            Ok(pending) => pending,
            Err(err) => {
                warn!(question = %question_id, error = %err, "answer rejected");
                error.set(Some(ViewError::Unknown));
                return;
            }
        };
        saving.set(true);
        spawn(async move {
            let (result, snapshot) = pending.persist().await;
            controller.write().apply_snapshot(snapshot);
            saving.set(false);
            match result {
                Ok(_) => error.set(None),
                Err(err) => {
                    warn!(question = %question_id, error = %err, "answer not saved");
                    error.set(Some(ViewError::Storage));
                }
            }
        });
    });

    let on_next = move |_: MouseEvent| {
        let advanced = controller.write().advance();
        grid_open.set(false);
        match advanced {
            Ok(Advance::Next(_)) => {}
            Ok(Advance::Finished { chapter_id, mode }) => {
                let title = controller
                    .read()
                    .catalog()
                    .chapter(&chapter_id)
                    .map(|chapter| chapter.title().to_string())
                    .unwrap_or_default();
                finished.set(Some(FinishedQuiz { title, mode }));
            }
            Err(err) => {
                warn!(error = %err, "advance failed");
                error.set(Some(ViewError::Unknown));
            }
        }
    };

    let on_jump = use_callback(move |index: usize| {
        // Out-of-range jumps are rejected and leave the position alone.
        if let Err(err) = controller.write().jump_to(index) {
            warn!(error = %err, "ignored jump");
        }
        grid_open.set(false);
    });

    let go_home = move |_: MouseEvent| {
        controller.write().abandon();
        navigator.push(Route::Home {});
    };

    if let Some(done) = finished() {
        let heading = match done.mode {
            QuizMode::Practice => "Chapter complete",
            QuizMode::Review => "Review complete",
        };
        return rsx! {
            div { class: "page quiz-page",
                div { class: "quiz-panel quiz-panel--complete",
                    h2 { "{heading}" }
                    p { "You reached the end of {done.title}." }
                    button {
                        class: "btn btn-primary",
                        id: "quiz-complete-home",
                        r#type: "button",
                        onclick: go_home,
                        "Back to home"
                    }
                }
            }
        };
    }

    match screen {
        QuizScreen::NoSession => rsx! {
            div { class: "page quiz-page",
                div { class: "quiz-panel",
                    p { "No quiz in progress." }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: go_home,
                        "Back to home"
                    }
                }
            }
        },
        QuizScreen::EmptyReview { title } => rsx! {
            div { class: "page quiz-page",
                div { class: "quiz-panel quiz-panel--empty",
                    h2 { "Nothing to review" }
                    p { "{title} has no open mistakes. Either you never missed one or you have fixed them all." }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: go_home,
                        "Back to home"
                    }
                }
            }
        },
        QuizScreen::Playing(data) => {
            let counter = counter_label(data.index, data.len);
            let percent = progress_percent(data.index, data.len);
            let hint = footer_hint(data.mode);
            let next = next_label(data.is_last);
            let review = data.mode == QuizMode::Review;
            let question_key = data.question.id().to_string();
            let counter_class = if grid_open() {
                "quiz-counter quiz-counter--open"
            } else {
                "quiz-counter"
            };
            rsx! {
                div { class: "page quiz-page",
                    header { class: "quiz-header",
                        div { class: "quiz-header__row",
                            button {
                                class: "quiz-back",
                                id: "quiz-back",
                                r#type: "button",
                                aria_label: "Back to home",
                                onclick: go_home,
                                "‹"
                            }
                            span { class: "quiz-header__title", "{data.title}" }
                            button {
                                class: "{counter_class}",
                                id: "quiz-counter",
                                r#type: "button",
                                onclick: move |_| grid_open.set(!grid_open()),
                                "{counter}"
                            }
                        }
                        div { class: "quiz-progress",
                            div { class: "quiz-progress__bar", style: "width: {percent}%" }
                        }
                    }
                    if grid_open() {
                        NavigatorGrid { cells: data.grid.clone(), on_jump }
                    }
                    if let Some(err) = error() {
                        p { class: "view-error", "{err.message()}" }
                    }
                    QuestionCard {
                        key: "{question_key}",
                        question: data.question.clone(),
                        review,
                        on_submit,
                    }
                    footer { class: "quiz-footer",
                        span { class: "quiz-footer__hint", "{hint}" }
                        button {
                            class: "btn btn-dark",
                            id: "quiz-next",
                            r#type: "button",
                            disabled: saving(),
                            onclick: on_next,
                            "{next}"
                        }
                    }
                }
            }
        }
    }
}
