use std::sync::Arc;

use services::{CompletionStore, InMemoryTopicSource, TopicRepository, TopicSource};
use storage::{LocalProgress, Storage};
use study_core::model::{Manifest, TopicId};

use crate::context::{AppContext, UiApp, build_app_context};
use crate::sink::RecordingSink;

struct TestApp {
    source: InMemoryTopicSource,
    manifest: Manifest,
    completion_store: Arc<CompletionStore>,
}

impl UiApp for TestApp {
    fn topic_source(&self) -> Arc<dyn TopicSource> {
        Arc::new(self.source.clone())
    }

    fn manifest(&self) -> Manifest {
        self.manifest.clone()
    }

    fn completion_store(&self) -> Arc<CompletionStore> {
        Arc::clone(&self.completion_store)
    }
}

pub struct ViewHarness {
    pub source: InMemoryTopicSource,
    pub store: Arc<CompletionStore>,
    pub sink: RecordingSink,
    pub ctx: AppContext,
}

impl ViewHarness {
    pub fn sink(&self) -> Arc<RecordingSink> {
        Arc::new(self.sink.clone())
    }
}

pub fn id(raw: &str) -> TopicId {
    TopicId::new(raw).expect("valid id")
}

/// A topic document with two objectives, one flashcard and one resource.
pub fn topic_json(id: &str, title: &str, order: i64) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "title": "{title}",
            "order": {order},
            "objectives": ["Popsat vznik", "Vyjmenovat díla"],
            "materials": {{
                "summary": "**Shrnutí** tématu",
                "sections": [{{"heading": "Počátky", "content": "První odstavec\n\nDruhý"}}]
            }},
            "resources": [{{"title": "Zdroj", "url": "https://example.org/?a=1&b=2", "reason": "Přehled"}}],
            "flashcards": [{{"q": "Kdo?", "a": "*Noverre*"}}]
        }}"#
    )
}

/// Harness whose manifest lists `ids`; documents are added by the caller.
pub fn setup_view_harness(ids: &[&str]) -> ViewHarness {
    let source = InMemoryTopicSource::new();
    let storage = Storage::in_memory();
    let store = Arc::new(CompletionStore::new(Arc::new(LocalProgress::new(
        Arc::clone(&storage.kv),
    ))));
    let app: Arc<dyn UiApp> = Arc::new(TestApp {
        source: source.clone(),
        manifest: Manifest::new(ids.iter().map(|raw| id(raw))),
        completion_store: Arc::clone(&store),
    });

    ViewHarness {
        source,
        store,
        sink: RecordingSink::new(),
        ctx: build_app_context(&app),
    }
}

pub fn insert_topic(source: &InMemoryTopicSource, raw_id: &str, title: &str, order: i64) {
    source.insert(
        TopicRepository::document_path(&id(raw_id)),
        topic_json(raw_id, title, order),
    );
}
