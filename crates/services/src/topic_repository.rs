use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tracing::{debug, error, info, warn};
use url::form_urlencoded;

use study_core::model::{Manifest, Topic, TopicDraft, TopicId};

use crate::error::LoadError;
use crate::topic_source::TopicSource;

/// Detail page that renders one topic.
pub const TOPIC_PAGE: &str = "topic.html";

/// Loads topic documents and answers navigation queries over the loaded
/// collection.
///
/// The collection is ordered by `Topic::order`, unique by id, and replaced
/// wholesale by every `load_all` call.
pub struct TopicRepository {
    source: Arc<dyn TopicSource>,
    manifest: Manifest,
    topics: Vec<Topic>,
}

impl TopicRepository {
    #[must_use]
    pub fn new(source: Arc<dyn TopicSource>, manifest: Manifest) -> Self {
        Self {
            source,
            manifest,
            topics: Vec::new(),
        }
    }

    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The collection built by the last `load_all` (empty before the first).
    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Fetch every manifest topic concurrently and rebuild the collection.
    ///
    /// A topic that fails to fetch, parse or validate is logged and left
    /// out; it never aborts the others. Topics are kept in completion order,
    /// then stably sorted by `order`.
    pub async fn load_all(&mut self) -> &[Topic] {
        let mut pending: FuturesUnordered<_> = self
            .manifest
            .ids()
            .iter()
            .map(|id| {
                let source = Arc::clone(&self.source);
                let id = id.clone();
                async move { fetch_topic(source.as_ref(), &id).await }
            })
            .collect();

        let mut loaded: Vec<Topic> = Vec::with_capacity(self.manifest.len());
        while let Some(result) = pending.next().await {
            match result {
                Ok(topic) => {
                    if loaded.iter().any(|seen| seen.id() == topic.id()) {
                        warn!(topic_id = %topic.id(), "duplicate topic id; keeping the first");
                        continue;
                    }
                    loaded.push(topic);
                }
                Err(err) => {
                    warn!(topic_id = %err.topic_id(), error = %err, "skipping topic");
                }
            }
        }

        loaded.sort_by_key(Topic::order);

        if loaded.is_empty() {
            error!(
                manifest = self.manifest.len(),
                "no topics could be loaded; check that data/topics/ exists"
            );
        } else {
            info!(loaded = loaded.len(), manifest = self.manifest.len(), "topics loaded");
        }

        self.topics = loaded;
        &self.topics
    }

    /// Fetch and validate a single topic. The collection is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Fetch` (with the status when known),
    /// `LoadError::Parse` or `LoadError::Invalid`.
    pub async fn load_one(&self, id: &TopicId) -> Result<Topic, LoadError> {
        fetch_topic(self.source.as_ref(), id).await
    }

    #[must_use]
    pub fn get_by_id(&self, id: &TopicId) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.id() == id)
    }

    #[must_use]
    pub fn get_next(&self, id: &TopicId) -> Option<&Topic> {
        let index = self.position(id)?;
        self.topics.get(index + 1)
    }

    #[must_use]
    pub fn get_previous(&self, id: &TopicId) -> Option<&Topic> {
        let index = self.position(id)?;
        index.checked_sub(1).and_then(|prev| self.topics.get(prev))
    }

    fn position(&self, id: &TopicId) -> Option<usize> {
        self.topics.iter().position(|topic| topic.id() == id)
    }

    /// Detail page address for a topic.
    #[must_use]
    pub fn url_for(id: &TopicId) -> String {
        let encoded: String = form_urlencoded::byte_serialize(id.as_str().as_bytes()).collect();
        format!("{TOPIC_PAGE}?id={encoded}")
    }

    /// Resource path of a topic document, relative to the site root.
    #[must_use]
    pub fn document_path(id: &TopicId) -> String {
        format!("data/topics/{id}.json")
    }
}

async fn fetch_topic(source: &dyn TopicSource, id: &TopicId) -> Result<Topic, LoadError> {
    let path = TopicRepository::document_path(id);
    debug!(topic_id = %id, %path, "fetching topic");

    let body = source.fetch(&path).await.map_err(|source| LoadError::Fetch {
        id: id.clone(),
        source,
    })?;
    let draft: TopicDraft = serde_json::from_str(&body).map_err(|source| LoadError::Parse {
        id: id.clone(),
        source,
    })?;
    let topic = draft.validate().map_err(|source| LoadError::Invalid {
        id: id.clone(),
        source,
    })?;

    debug!(topic_id = %id, title = topic.title(), "topic loaded");
    Ok(topic)
}
