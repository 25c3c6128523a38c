//! Shared error types for the services crate.

use thiserror::Error;

use study_core::model::{TopicError, TopicId};

/// Errors emitted by a `TopicSource` while retrieving a document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors emitted while loading a single topic document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to load topic {id}: {source}")]
    Fetch { id: TopicId, source: SourceError },
    #[error("topic {id} is not valid JSON: {source}")]
    Parse {
        id: TopicId,
        source: serde_json::Error,
    },
    #[error("topic {id} has an invalid structure: {source}")]
    Invalid { id: TopicId, source: TopicError },
}

impl LoadError {
    /// The requested topic id.
    #[must_use]
    pub fn topic_id(&self) -> &TopicId {
        match self {
            LoadError::Fetch { id, .. }
            | LoadError::Parse { id, .. }
            | LoadError::Invalid { id, .. } => id,
        }
    }

    /// HTTP-equivalent status of a failed fetch, when one is known.
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            LoadError::Fetch {
                source: SourceError::HttpStatus(status),
                ..
            } => Some(*status),
            LoadError::Fetch {
                source: SourceError::Http(err),
                ..
            } => err.status(),
            _ => None,
        }
    }
}
