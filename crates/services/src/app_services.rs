use std::sync::Arc;

use quiz_core::model::Catalog;
use storage::repository::Storage;
use tracing::info;

use crate::error::AppServicesError;
use crate::explanation_service::{ExplanationService, Explainer};
use crate::sessions::SessionController;

/// Assembles the catalog, storage, and optional explainer used by the app.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    storage: Storage,
    explainer: Option<Arc<dyn Explainer>>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage, with an explainer if one is
    /// configured in the environment.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, catalog: Arc<Catalog>) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let explainer = ExplanationService::from_env().map(|service| {
            info!(model = service.model(), "AI explanations enabled");
            Arc::new(service) as Arc<dyn Explainer>
        });
        Ok(Self {
            catalog,
            storage,
            explainer,
        })
    }

    /// Build services over an in-memory store without an explainer.
    #[must_use]
    pub fn in_memory(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            storage: Storage::in_memory(),
            explainer: None,
        }
    }

    #[must_use]
    pub fn with_explainer(mut self, explainer: Arc<dyn Explainer>) -> Self {
        self.explainer = Some(explainer);
        self
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn explainer(&self) -> Option<Arc<dyn Explainer>> {
        self.explainer.clone()
    }

    /// A fresh controller at `Home` with snapshots read from storage.
    pub async fn session_controller(&self) -> SessionController {
        SessionController::new(Arc::clone(&self.catalog), self.storage.quiz_state.clone()).await
    }
}
