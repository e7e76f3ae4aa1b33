#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use dioxus::prelude::*;
use quiz_core::model::{OptionKey, Question, QuestionId};
use quiz_core::{Submission, Verdict, evaluate};
use services::explain_or_placeholder;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{kind_badge, markdown_to_html, option_mark, verdict_banner};

/// One question with its own pick/submit state.
///
/// Keyed by question id in the parent, so moving to another question starts fresh
/// and drops any explanation request still in flight.
#[component]
pub fn QuestionCard(
    question: Question,
    review: bool,
    on_submit: EventHandler<(QuestionId, Submission)>,
) -> Element {
    let mut picked = use_signal(Submission::new);
    let mut verdict = use_signal(|| None::<Verdict>);
    let mut show_explanation = use_signal(|| false);

    let submit = {
        let question = question.clone();
        use_callback(move |submission: Submission| {
            if verdict.peek().is_some() {
                return;
            }
            verdict.set(Some(evaluate(&question, &submission)));
            on_submit.call((question.id().clone(), submission));
        })
    };

    let single = question.kind().is_single();

    // Single choice answers on the first click; multiple choice only toggles.
    let pick = use_callback(move |key: OptionKey| {
        if verdict.peek().is_some() {
            return;
        }
        if single {
            let submission = Submission::from_iter([key]);
            picked.set(submission.clone());
            submit.call(submission);
        } else {
            picked.write().toggle(key);
        }
    });
    let submit_picked = use_callback(move |()| {
        let submission = picked.peek().clone();
        if !submission.is_empty() {
            submit.call(submission);
        }
    });

    let open_explanation = use_callback(move |()| show_explanation.set(true));

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuestionCardTestHandles>() {
                handles.register(pick, submit_picked, open_explanation);
            }
        }
    }

    let submitted = verdict().is_some();
    let (kind_label, kind_class) = kind_badge(question.kind());
    let static_explanation = question.explanation().map(markdown_to_html);

    let options = question.options().iter().map(|option| {
        let key = option.key().clone();
        let mark = option_mark(&key, &question, &picked.read(), submitted);
        let label = key.to_string();
        let text = option.text().to_string();
        rsx! {
            button {
                key: "{label}",
                class: mark.class(),
                r#type: "button",
                disabled: submitted,
                onclick: move |_| pick.call(key.clone()),
                span { class: "quiz-option__key", "{label}" }
                span { class: "quiz-option__text", "{text}" }
                if let Some(icon) = mark.icon() {
                    span { class: "quiz-option__icon", "{icon}" }
                }
            }
        }
    });

    rsx! {
        div { class: "question-card",
            div { class: "question-card__badges",
                span { class: kind_class, "{kind_label}" }
                if review {
                    span { class: "badge badge--review", "Mistake review" }
                }
            }
            h3 { class: "question-card__prompt", "{question.prompt()}" }
            div { class: "question-card__options", {options} }
            if !single && !submitted {
                button {
                    class: "btn btn-primary question-card__submit",
                    id: "question-submit",
                    r#type: "button",
                    disabled: picked.read().is_empty(),
                    onclick: move |_| submit_picked.call(()),
                    "Submit answer"
                }
            }
            if let Some(result) = verdict() {
                VerdictBanner { verdict: result, question: question.clone() }
                if let Some(html) = static_explanation {
                    div { class: "question-card__explanation", dangerous_inner_html: "{html}" }
                }
                if show_explanation() {
                    ExplanationPanel { question: question.clone() }
                } else {
                    button {
                        class: "btn btn-secondary",
                        id: "question-explain",
                        r#type: "button",
                        onclick: move |_| open_explanation.call(()),
                        "AI explanation"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuestionCardTestHandles {
    pick: Rc<RefCell<Option<Callback<OptionKey>>>>,
    submit: Rc<RefCell<Option<Callback<()>>>>,
    explain: Rc<RefCell<Option<Callback<()>>>>,
}

#[cfg(test)]
impl QuestionCardTestHandles {
    pub(crate) fn register(
        &self,
        pick: Callback<OptionKey>,
        submit: Callback<()>,
        explain: Callback<()>,
    ) {
        *self.pick.borrow_mut() = Some(pick);
        *self.submit.borrow_mut() = Some(submit);
        *self.explain.borrow_mut() = Some(explain);
    }

    /// Same as clicking the option button with this key.
    pub(crate) fn pick(&self) -> Callback<OptionKey> {
        (*self.pick.borrow()).expect("card pick registered")
    }

    /// Same as pressing `#question-submit`.
    pub(crate) fn submit(&self) -> Callback<()> {
        (*self.submit.borrow()).expect("card submit registered")
    }

    /// Same as pressing `#question-explain`.
    pub(crate) fn explain(&self) -> Callback<()> {
        (*self.explain.borrow()).expect("card explain registered")
    }
}

#[component]
fn VerdictBanner(verdict: Verdict, question: Question) -> Element {
    let (title, detail) = verdict_banner(verdict, question.correct_keys());
    let class = if verdict.is_correct() {
        "verdict verdict--correct"
    } else {
        "verdict verdict--wrong"
    };
    rsx! {
        div { class,
            p { class: "verdict__title", "{title}" }
            if let Some(detail) = detail {
                p { class: "verdict__detail", "{detail}" }
            }
        }
    }
}

/// Fetches an explanation as soon as it is mounted.
#[component]
fn ExplanationPanel(question: Question) -> Element {
    let ctx = use_context::<AppContext>();
    let resource = use_resource(move || {
        let explainer = ctx.explainer();
        let question = question.clone();
        async move {
            let text = explain_or_placeholder(explainer.as_deref(), &question).await;
            Ok::<_, ViewError>(markdown_to_html(&text))
        }
    });

    rsx! {
        div { class: "question-card__ai",
            h4 { "AI explanation" }
            match view_state_from_resource(resource) {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "question-card__ai-loading", "Generating explanation..." }
                },
                ViewState::Ready(html) => rsx! {
                    div { class: "question-card__ai-body", dangerous_inner_html: "{html}" }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}
