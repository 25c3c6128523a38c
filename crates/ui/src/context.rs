use std::sync::Arc;

use services::{CompletionStore, TopicRepository, TopicSource};
use study_core::model::Manifest;

/// Default site title, appended to every topic page title.
pub const SITE_TITLE: &str = "Dějiny tance a baletu - Maturitní otázky";

pub trait UiApp: Send + Sync {
    fn topic_source(&self) -> Arc<dyn TopicSource>;
    fn manifest(&self) -> Manifest;
    fn completion_store(&self) -> Arc<CompletionStore>;

    fn site_title(&self) -> String {
        SITE_TITLE.to_string()
    }
}

/// Dependencies handed to every page controller.
#[derive(Clone)]
pub struct AppContext {
    source: Arc<dyn TopicSource>,
    manifest: Manifest,
    completion_store: Arc<CompletionStore>,
    site_title: String,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            source: app.topic_source(),
            manifest: app.manifest(),
            completion_store: app.completion_store(),
            site_title: app.site_title(),
        }
    }

    /// A fresh repository, as a newly loaded page would have.
    #[must_use]
    pub fn new_repository(&self) -> TopicRepository {
        TopicRepository::new(Arc::clone(&self.source), self.manifest.clone())
    }

    #[must_use]
    pub fn completion_store(&self) -> Arc<CompletionStore> {
        Arc::clone(&self.completion_store)
    }

    #[must_use]
    pub fn site_title(&self) -> &str {
        &self.site_title
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
