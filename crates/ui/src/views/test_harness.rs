use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::{Catalog, ChapterDraft, QuestionDraft, QuestionKind};
use services::{AppServices, Explainer, SessionController};

use crate::context::{UiApp, build_app_context, use_quiz_provider};
use crate::views::quiz::QuestionCardTestHandles;
use crate::views::{HomeView, QuizView};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
    controller: SessionController,
}

impl UiApp for TestApp {
    fn catalog(&self) -> Arc<Catalog> {
        self.services.catalog()
    }

    fn explainer(&self) -> Option<Arc<dyn Explainer>> {
        self.services.explainer()
    }

    fn session_controller(&self) -> SessionController {
        self.controller.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Quiz,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    card: QuestionCardTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_quiz_provider();
    use_context_provider(|| props.view);
    use_context_provider(|| props.card.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Quiz => rsx! { QuizView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    /// Callbacks of the question card currently on screen.
    pub card: QuestionCardTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Two chapters: `c1` with three questions, `c2` with one.
pub fn test_catalog() -> Arc<Catalog> {
    let c1 = ChapterDraft::new(
        "c1",
        "The Opium Wars",
        vec![
            QuestionDraft::new(
                "c1-q1",
                QuestionKind::Single,
                "When did the First Opium War begin?",
                &["A. 1839", "B. 1856"],
                &["A"],
            ),
            QuestionDraft::new(
                "c1-q2",
                QuestionKind::Multiple,
                "Which ports opened under the Treaty of Nanking?",
                &["A. Canton", "B. Tianjin", "C. Shanghai"],
                &["A", "C"],
            ),
            QuestionDraft::new(
                "c1-q3",
                QuestionKind::Single,
                "Which island was ceded to Britain in 1842?",
                &["A. Hong Kong", "B. Taiwan"],
                &["A"],
            ),
        ],
    );
    let c2 = ChapterDraft::new(
        "c2",
        "The Taiping Rebellion",
        vec![QuestionDraft::new(
            "c2-q1",
            QuestionKind::Single,
            "Who led the Taiping Heavenly Kingdom?",
            &["A. Hong Xiuquan", "B. Zeng Guofan"],
            &["A"],
        )],
    );
    Arc::new(Catalog::from_drafts(vec![c1, c2]).expect("valid test catalog"))
}

#[must_use]
pub fn test_services() -> AppServices {
    AppServices::in_memory(test_catalog())
}

/// Build a harness around an already prepared controller.
pub fn setup_view_harness(
    view: ViewKind,
    services: AppServices,
    controller: SessionController,
) -> ViewHarness {
    let app = Arc::new(TestApp {
        services,
        controller,
    });
    let card = QuestionCardTestHandles::default();
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            card: card.clone(),
        },
    );
    ViewHarness { dom, card }
}
