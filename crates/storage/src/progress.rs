//! Persistence for per-topic completion flags.

use std::collections::BTreeMap;
use std::sync::Arc;

use study_core::model::TopicId;

use crate::repository::{KeyValueStore, StorageError};

/// Storage key the completion map is persisted under.
pub const PROGRESS_STORAGE_KEY: &str = "danceHistoryProgress";

/// Topic id to completion flag. A missing entry means "not completed".
pub type CompletionMap = BTreeMap<TopicId, bool>;

/// Whole-map persistence for completion flags.
///
/// Every update is a full read-modify-write; there is no per-key API. The
/// local variant is `LocalProgress`; a remote variant implements the same
/// trait.
pub trait ProgressBackend: Send + Sync {
    /// Load the persisted map, or `None` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored data is corrupted,
    /// or other storage errors if the backend cannot be read.
    fn load(&self) -> Result<Option<CompletionMap>, StorageError>;

    /// Replace the persisted map.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the map cannot be written.
    fn save(&self, map: &CompletionMap) -> Result<(), StorageError>;
}

/// Completion map serialized as one JSON object in a `KeyValueStore`.
#[derive(Clone)]
pub struct LocalProgress {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl LocalProgress {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, PROGRESS_STORAGE_KEY)
    }

    #[must_use]
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl ProgressBackend for LocalProgress {
    fn load(&self) -> Result<Option<CompletionMap>, StorageError> {
        let Some(raw) = self.store.get_item(&self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    fn save(&self, map: &CompletionMap) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(map).map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.store.set_item(&self.key, &raw)
    }
}
