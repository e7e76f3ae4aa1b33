use dioxus::prelude::*;
use dioxus_router::use_navigator;
use quiz_core::model::ChapterId;
use services::QuizMode;
use tracing::warn;

use crate::context::use_quiz;
use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::{map_chapter_cards, map_home_stats};

#[component]
pub fn HomeView() -> Element {
    let quiz = use_quiz();
    let navigator = use_navigator();
    let mut controller = quiz.controller;
    let mut confirm_reset = use_signal(|| false);
    let mut resetting = use_signal(|| false);
    let mut error = use_signal(|| None::<ViewError>);

    let (stats, cards) = {
        let ctl = controller.read();
        (
            map_home_stats(ctl.stats()),
            map_chapter_cards(&ctl.chapter_overviews()),
        )
    };

    let start = use_callback(move |(chapter_id, mode): (ChapterId, QuizMode)| {
        if *resetting.peek() {
            return;
        }
        let selected = controller.write().select_chapter(&chapter_id, mode);
        match selected {
            Ok(_) => {
                error.set(None);
                navigator.push(Route::Quiz {});
            }
            Err(err) => {
                warn!(chapter = %chapter_id, error = %err, "could not start quiz");
                error.set(Some(ViewError::Unknown));
            }
        }
    });

    let on_reset = move |_: MouseEvent| {
        confirm_reset.set(false);
        resetting.set(true);
        let pending = controller.write().start_reset();
        spawn(async move {
            let (result, snapshot) = pending.run().await;
            controller.write().apply_snapshot(snapshot);
            resetting.set(false);
            match result {
                Ok(()) => error.set(None),
                Err(err) => {
                    warn!(error = %err, "reset failed");
                    error.set(Some(ViewError::Storage));
                }
            }
        });
    };

    let busy = resetting();
    let chapter_cards = cards.into_iter().map(|card| {
        let practice_id = ChapterId::new(card.chapter_id.clone());
        let review_id = practice_id.clone();
        rsx! {
            div { key: "{card.chapter_id}", class: "chapter-card",
                h3 { class: "chapter-card__title", "{card.title}" }
                p { class: "chapter-card__count", "{card.count_label}" }
                div { class: "chapter-card__actions",
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| start.call((practice_id.clone(), QuizMode::Practice)),
                        "Start practice"
                    }
                    if let Some(label) = card.review_label.clone() {
                        button {
                            class: "btn btn-review",
                            r#type: "button",
                            disabled: busy,
                            onclick: move |_| start.call((review_id.clone(), QuizMode::Review)),
                            "{label}"
                        }
                    }
                }
            }
        }
    });

    rsx! {
        div { class: "page home-page",
            header { class: "view-header",
                h2 { class: "view-title", "Outline of Modern Chinese History" }
                p { class: "view-subtitle", "Chapter quizzes with a mistakes notebook" }
            }
            div { class: "stat-tiles",
                div { class: "stat-tile",
                    span { class: "stat-tile__value",
                        "{stats.completed_label} "
                        span { class: "stat-tile__total", "{stats.total_label}" }
                    }
                    span { class: "stat-tile__label", "Questions answered" }
                }
                div { class: "stat-tile",
                    span { class: "stat-tile__value", "{stats.wrong_label}" }
                    span { class: "stat-tile__label", "Current mistakes" }
                }
            }
            if let Some(err) = error() {
                p { class: "view-error", "{err.message()}" }
            }
            h3 { class: "section-title", "Chapters" }
            div { class: "chapter-grid", {chapter_cards} }
            div { class: "home-footer",
                button {
                    class: "btn btn-ghost btn-danger",
                    r#type: "button",
                    disabled: resetting(),
                    onclick: move |_| confirm_reset.set(true),
                    "Reset all data"
                }
            }
            if confirm_reset() {
                div { class: "modal-overlay",
                    div {
                        class: "modal",
                        role: "dialog",
                        aria_modal: "true",
                        h3 { "Reset all data?" }
                        p { "This clears your progress and your mistakes list. It cannot be undone." }
                        div { class: "modal__actions",
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| confirm_reset.set(false),
                                "Cancel"
                            }
                            button {
                                class: "btn btn-danger",
                                id: "confirm-reset",
                                r#type: "button",
                                onclick: on_reset,
                                "Reset"
                            }
                        }
                    }
                }
            }
        }
    }
}
