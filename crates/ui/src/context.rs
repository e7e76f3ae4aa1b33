use std::sync::Arc;

use dioxus::prelude::*;
use quiz_core::model::Catalog;
use services::{Explainer, SessionController};

pub trait UiApp: Send + Sync {
    fn catalog(&self) -> Arc<Catalog>;
    fn explainer(&self) -> Option<Arc<dyn Explainer>>;

    /// Controller with snapshots already loaded, used as the initial quiz state.
    fn session_controller(&self) -> SessionController;
}

#[derive(Clone)]
pub struct AppContext {
    catalog: Arc<Catalog>,
    explainer: Option<Arc<dyn Explainer>>,
    initial_controller: SessionController,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            catalog: app.catalog(),
            explainer: app.explainer(),
            initial_controller: app.session_controller(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn explainer(&self) -> Option<Arc<dyn Explainer>> {
        self.explainer.clone()
    }

    #[must_use]
    pub fn initial_controller(&self) -> SessionController {
        self.initial_controller.clone()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// The one session controller shared by every route.
#[derive(Clone, Copy)]
pub struct QuizHandle {
    pub controller: Signal<SessionController>,
}

/// Provide the shared controller, seeded from the `AppContext`.
pub fn use_quiz_provider() -> QuizHandle {
    let ctx = use_context::<AppContext>();
    use_context_provider(move || QuizHandle {
        controller: Signal::new(ctx.initial_controller()),
    })
}

#[must_use]
pub fn use_quiz() -> QuizHandle {
    use_context::<QuizHandle>()
}
