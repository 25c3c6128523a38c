//! Reachability checks for the external resources listed by topics.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use study_core::model::{Resource, Topic, TopicDraft, TopicError, TopicId};

const CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of checking one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    Valid,
    Invalid(String),
}

impl LinkStatus {
    /// 2xx and 3xx are reachable; everything else is dead.
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_success() || status.is_redirection() {
            LinkStatus::Valid
        } else {
            LinkStatus::Invalid(format!("HTTP {}", status.as_u16()))
        }
    }
}

#[async_trait]
pub trait LinkChecker: Send + Sync {
    async fn check(&self, url: &str) -> LinkStatus;
}

/// Checks links with a HEAD request, retrying as GET when the server
/// answers `405 Method Not Allowed`.
#[derive(Clone, Default)]
pub struct HttpLinkChecker {
    client: Client,
}

impl HttpLinkChecker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkChecker for HttpLinkChecker {
    async fn check(&self, url: &str) -> LinkStatus {
        let head = self.client.head(url).timeout(CHECK_TIMEOUT).send().await;
        let response = match head {
            Ok(response) if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
                self.client.get(url).timeout(CHECK_TIMEOUT).send().await
            }
            other => other,
        };

        match response {
            Ok(response) => LinkStatus::from_status(response.status()),
            Err(err) if err.is_timeout() => LinkStatus::Invalid("timeout".into()),
            Err(err) => LinkStatus::Invalid(err.to_string()),
        }
    }
}

/// A resource whose URL did not answer with 2xx/3xx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLink {
    pub topic_id: TopicId,
    pub title: String,
    pub url: String,
    pub reason: String,
}

/// Check every resource of every topic, one request at a time, in topic
/// order. Resources without a URL are skipped.
pub async fn find_dead_links(topics: &[Topic], checker: &dyn LinkChecker) -> Vec<DeadLink> {
    let mut dead = Vec::new();
    let mut checked = 0usize;

    for topic in topics {
        for resource in topic.resources() {
            if resource.url.trim().is_empty() {
                warn!(topic_id = %topic.id(), title = %resource.title, "resource has no url");
                continue;
            }
            checked += 1;
            match checker.check(&resource.url).await {
                LinkStatus::Valid => debug!(url = %resource.url, "link ok"),
                LinkStatus::Invalid(reason) => {
                    warn!(topic_id = %topic.id(), url = %resource.url, %reason, "dead link");
                    dead.push(DeadLink {
                        topic_id: topic.id().clone(),
                        title: resource.title.clone(),
                        url: resource.url.clone(),
                        reason,
                    });
                }
            }
        }
    }

    info!(checked, dead = dead.len(), "link check finished");
    dead
}

/// `topic` without the resources listed in `dead` for it.
///
/// # Errors
///
/// Only fails if `topic` itself would not validate, which a loaded topic
/// always does.
pub fn prune_dead_links(topic: Topic, dead: &[DeadLink]) -> Result<Topic, TopicError> {
    let id = topic.id().clone();
    let is_dead = |resource: &Resource| {
        dead.iter()
            .any(|link| link.topic_id == id && link.url == resource.url)
    };

    let mut draft = TopicDraft::from(topic);
    draft.resources.retain(|resource| !is_dead(resource));
    draft.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use study_core::model::Manifest;

    use crate::{InMemoryTopicSource, TopicRepository};

    /// Answers from a fixed table; unknown URLs are valid. Records calls.
    #[derive(Default)]
    struct TableChecker {
        dead: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LinkChecker for TableChecker {
        async fn check(&self, url: &str) -> LinkStatus {
            self.calls.lock().unwrap().push(url.to_owned());
            match self.dead.get(url) {
                Some(reason) => LinkStatus::Invalid(reason.clone()),
                None => LinkStatus::Valid,
            }
        }
    }

    fn topic(json: &str) -> Topic {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn status_classes() {
        assert_eq!(LinkStatus::from_status(StatusCode::OK), LinkStatus::Valid);
        assert_eq!(
            LinkStatus::from_status(StatusCode::MOVED_PERMANENTLY),
            LinkStatus::Valid
        );
        assert_eq!(
            LinkStatus::from_status(StatusCode::NOT_FOUND),
            LinkStatus::Invalid("HTTP 404".into())
        );
        assert_eq!(
            LinkStatus::from_status(StatusCode::FORBIDDEN),
            LinkStatus::Invalid("HTTP 403".into())
        );
    }

    #[tokio::test]
    async fn reports_dead_links_in_topic_order() {
        let source = InMemoryTopicSource::new();
        source.insert(
            "data/topics/T01.json",
            r#"{"id": "T01", "title": "A", "order": 1, "resources": [
                {"title": "ok", "url": "https://ok.example"},
                {"title": "gone", "url": "https://gone.example"},
                {"title": "blank", "url": ""}
            ]}"#,
        );
        source.insert(
            "data/topics/T02.json",
            r#"{"id": "T02", "title": "B", "order": 2, "resources": [{"title": "x", "url": "https://x.example"}]}"#,
        );
        let manifest = Manifest::parse_list("T02,T01").unwrap();
        let mut repository = TopicRepository::new(Arc::new(source), manifest);
        repository.load_all().await;

        let checker = TableChecker {
            dead: HashMap::from([
                ("https://gone.example".to_string(), "HTTP 404".to_string()),
                ("https://x.example".to_string(), "timeout".to_string()),
            ]),
            ..TableChecker::default()
        };

        let dead = find_dead_links(repository.topics(), &checker).await;
        let urls: Vec<&str> = dead.iter().map(|link| link.url.as_str()).collect();
        assert_eq!(urls, ["https://gone.example", "https://x.example"]);
        assert_eq!(dead[0].topic_id.as_str(), "T01");
        assert_eq!(dead[0].title, "gone");
        assert_eq!(dead[1].reason, "timeout");
        assert_eq!(checker.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn no_resources_means_no_requests() {
        let checker = TableChecker::default();
        let topics = [topic(r#"{"id": "T01", "title": "A"}"#)];
        assert!(find_dead_links(&topics, &checker).await.is_empty());
        assert!(checker.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn prune_keeps_live_resources_of_the_topic() {
        let original = topic(
            r#"{"id": "T01", "title": "A", "order": 2, "resources": [
                {"title": "ok", "url": "https://ok.example"},
                {"title": "gone", "url": "https://gone.example"}
            ]}"#,
        );
        let dead = [
            DeadLink {
                topic_id: TopicId::new("T01").unwrap(),
                title: "gone".into(),
                url: "https://gone.example".into(),
                reason: "HTTP 404".into(),
            },
            DeadLink {
                topic_id: TopicId::new("T02").unwrap(),
                title: "ok elsewhere".into(),
                url: "https://ok.example".into(),
                reason: "HTTP 404".into(),
            },
        ];

        let pruned = prune_dead_links(original.clone(), &dead).unwrap();
        assert_eq!(pruned.resources().len(), 1);
        assert_eq!(pruned.resources()[0].title, "ok");
        assert_eq!(pruned.order(), original.order());
        assert_eq!(pruned.title(), original.title());
    }
}
