use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::SourceError;

/// Retrieves static site documents by relative path.
#[async_trait]
pub trait TopicSource: Send + Sync {
    /// Fetch the document at `path` (relative to the site root) as text.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::HttpStatus` for non-success responses (a missing
    /// file maps to `404`), or transport/IO errors.
    async fn fetch(&self, path: &str) -> Result<String, SourceError>;
}

/// Where the site's static files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteRoot {
    Http(String),
    Dir(PathBuf),
}

impl SiteRoot {
    /// `http://` and `https://` values select a web root; anything else is a
    /// directory.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Http(trimmed.to_string())
        } else {
            Self::Dir(PathBuf::from(trimmed))
        }
    }

    #[must_use]
    pub fn into_source(self) -> Arc<dyn TopicSource> {
        match self {
            SiteRoot::Http(base_url) => Arc::new(HttpTopicSource::new(base_url)),
            SiteRoot::Dir(root) => Arc::new(FsTopicSource::new(root)),
        }
    }
}

#[derive(Clone)]
pub struct HttpTopicSource {
    client: Client,
    base_url: String,
}

impl HttpTopicSource {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl TopicSource for HttpTopicSource {
    async fn fetch(&self, path: &str) -> Result<String, SourceError> {
        let response = self.client.get(self.url_for(path)).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::HttpStatus(response.status()));
        }

        Ok(response.text().await?)
    }
}

/// Reads documents from a local site directory.
#[derive(Debug, Clone)]
pub struct FsTopicSource {
    root: PathBuf,
}

impl FsTopicSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl TopicSource for FsTopicSource {
    async fn fetch(&self, path: &str) -> Result<String, SourceError> {
        let relative = Path::new(path);
        // Only plain relative paths resolve under the root.
        if !relative
            .components()
            .all(|part| matches!(part, Component::Normal(_) | Component::CurDir))
        {
            return Err(SourceError::HttpStatus(StatusCode::NOT_FOUND));
        }

        match tokio::fs::read_to_string(self.root.join(relative)).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(SourceError::HttpStatus(StatusCode::NOT_FOUND))
            }
            Err(err) => Err(SourceError::Io(err)),
        }
    }
}

/// In-memory document source for testing and prototyping.
///
/// Documents may carry an artificial delay so tests can control the order in
/// which concurrent fetches complete.
#[derive(Clone, Default)]
pub struct InMemoryTopicSource {
    documents: Arc<Mutex<HashMap<String, InMemoryDocument>>>,
}

#[derive(Clone)]
struct InMemoryDocument {
    body: Result<String, StatusCode>,
    delay: Duration,
}

impl InMemoryTopicSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, body: impl Into<String>) {
        self.put(path.into(), Ok(body.into()), Duration::ZERO);
    }

    pub fn insert_delayed(&self, path: impl Into<String>, body: impl Into<String>, delay: Duration) {
        self.put(path.into(), Ok(body.into()), delay);
    }

    /// Make `path` answer with a non-success status.
    pub fn insert_status(&self, path: impl Into<String>, status: StatusCode) {
        self.put(path.into(), Err(status), Duration::ZERO);
    }

    fn put(&self, path: String, body: Result<String, StatusCode>, delay: Duration) {
        let mut guard = self
            .documents
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.insert(path, InMemoryDocument { body, delay });
    }
}

#[async_trait]
impl TopicSource for InMemoryTopicSource {
    async fn fetch(&self, path: &str) -> Result<String, SourceError> {
        let document = {
            let guard = self
                .documents
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            guard.get(path).cloned()
        };
        let Some(document) = document else {
            return Err(SourceError::HttpStatus(StatusCode::NOT_FOUND));
        };
        if !document.delay.is_zero() {
            tokio::time::sleep(document.delay).await;
        }
        document.body.map_err(SourceError::HttpStatus)
    }
}
