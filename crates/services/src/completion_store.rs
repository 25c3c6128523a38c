use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, warn};

use storage::{CompletionMap, ProgressBackend};
use study_core::model::TopicId;

/// Payload broadcast after every `set_completed` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdated {
    pub topic_id: TopicId,
    pub completed: bool,
}

/// Handle returned by `CompletionStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&ProgressUpdated) + Send + Sync>;

/// Per-topic completion flags with change notifications.
///
/// Storage failures never reach the caller: reads fall back to "not
/// completed" and failed writes are logged. Listeners are still notified
/// after a failed write so the UI reflects the user's toggle.
pub struct CompletionStore {
    backend: Arc<dyn ProgressBackend>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl CompletionStore {
    /// Create a store, writing an empty map if nothing usable is persisted.
    #[must_use]
    pub fn new(backend: Arc<dyn ProgressBackend>) -> Self {
        let store = Self {
            backend,
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        };
        if store.read_map().is_none() {
            store.write_map(&CompletionMap::new());
        }
        store
    }

    #[must_use]
    pub fn is_completed(&self, id: &TopicId) -> bool {
        self.read_map()
            .is_some_and(|map| map.get(id).copied().unwrap_or(false))
    }

    /// Record a completion flag and notify every listener.
    ///
    /// The whole map is read, updated and written back. Listeners run
    /// synchronously after the write attempt, even when the value is
    /// unchanged or the write failed.
    pub fn set_completed(&self, id: &TopicId, completed: bool) {
        let mut map = self.read_map().unwrap_or_default();
        map.insert(id.clone(), completed);
        self.write_map(&map);

        self.notify(&ProgressUpdated {
            topic_id: id.clone(),
            completed,
        });
    }

    /// Ids currently marked completed.
    #[must_use]
    pub fn list_completed(&self) -> Vec<TopicId> {
        self.read_map()
            .map(|map| {
                map.into_iter()
                    .filter_map(|(id, completed)| completed.then_some(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn count_completed(&self) -> usize {
        self.list_completed().len()
    }

    /// Register a listener for `ProgressUpdated` notifications.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ProgressUpdated) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut guard = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = guard.len();
        guard.retain(|(existing, _)| *existing != id);
        guard.len() != before
    }

    fn notify(&self, event: &ProgressUpdated) {
        // Snapshot so listeners may subscribe or unsubscribe while running.
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    fn read_map(&self) -> Option<CompletionMap> {
        match self.backend.load() {
            Ok(map) => map,
            Err(err) => {
                warn!(error = %err, "cannot read progress; treating as empty");
                None
            }
        }
    }

    fn write_map(&self, map: &CompletionMap) {
        if let Err(err) = self.backend.save(map) {
            error!(error = %err, "cannot write progress");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::{
        InMemoryStore, KeyValueStore, LocalProgress, PROGRESS_STORAGE_KEY, StorageError,
    };

    fn id(raw: &str) -> TopicId {
        TopicId::new(raw).unwrap()
    }

    fn store_over(kv: &InMemoryStore) -> CompletionStore {
        CompletionStore::new(Arc::new(LocalProgress::new(Arc::new(kv.clone()))))
    }

    /// Backend whose every operation fails.
    struct BrokenBackend;

    impl ProgressBackend for BrokenBackend {
        fn load(&self) -> Result<Option<CompletionMap>, StorageError> {
            Err(StorageError::Connection("unavailable".into()))
        }

        fn save(&self, _map: &CompletionMap) -> Result<(), StorageError> {
            Err(StorageError::Connection("unavailable".into()))
        }
    }

    #[test]
    fn new_store_initializes_empty_map() {
        let kv = InMemoryStore::new();
        let _store = store_over(&kv);
        assert_eq!(kv.get_item(PROGRESS_STORAGE_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn corrupted_data_self_heals() {
        let kv = InMemoryStore::new();
        kv.set_item(PROGRESS_STORAGE_KEY, "[[[").unwrap();
        let store = store_over(&kv);

        assert!(!store.is_completed(&id("T01")));
        assert_eq!(kv.get_item(PROGRESS_STORAGE_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn existing_progress_is_kept() {
        let kv = InMemoryStore::new();
        kv.set_item(PROGRESS_STORAGE_KEY, r#"{"T01":true}"#).unwrap();
        let store = store_over(&kv);
        assert!(store.is_completed(&id("T01")));
    }

    #[test]
    fn set_and_clear_completion() {
        let store = store_over(&InMemoryStore::new());
        assert!(!store.is_completed(&id("T01")));

        store.set_completed(&id("T01"), true);
        assert!(store.is_completed(&id("T01")));

        store.set_completed(&id("T01"), false);
        assert!(!store.is_completed(&id("T01")));
        assert_eq!(store.count_completed(), 0);
    }

    #[test]
    fn list_and_count_only_include_true_flags() {
        let store = store_over(&InMemoryStore::new());
        store.set_completed(&id("T01"), true);
        store.set_completed(&id("T02"), false);
        store.set_completed(&id("T03"), true);

        assert_eq!(store.list_completed(), vec![id("T01"), id("T03")]);
        assert_eq!(store.count_completed(), 2);
    }

    #[test]
    fn every_set_notifies_once_even_without_change() {
        let store = store_over(&InMemoryStore::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        store.set_completed(&id("T01"), true);
        store.set_completed(&id("T01"), true);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen[0],
            ProgressUpdated {
                topic_id: id("T01"),
                completed: true
            }
        );
    }

    #[test]
    fn listener_observes_persisted_state() {
        let store = Arc::new(store_over(&InMemoryStore::new()));
        let observed = Arc::new(Mutex::new(None));
        let (store_ref, sink) = (Arc::downgrade(&store), Arc::clone(&observed));
        store.subscribe(move |event| {
            if let Some(store) = store_ref.upgrade() {
                *sink.lock().unwrap() = Some(store.is_completed(&event.topic_id));
            }
        });

        store.set_completed(&id("T05"), true);
        assert_eq!(*observed.lock().unwrap(), Some(true));
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = store_over(&InMemoryStore::new());
        let count = Arc::new(AtomicU64::new(0));
        let sink = Arc::clone(&count);
        let handle = store.subscribe(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        store.set_completed(&id("T01"), true);
        assert!(store.unsubscribe(handle));
        assert!(!store.unsubscribe(handle));
        store.set_completed(&id("T01"), false);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn broken_backend_degrades_quietly_and_still_notifies() {
        let store = CompletionStore::new(Arc::new(BrokenBackend));
        let count = Arc::new(AtomicU64::new(0));
        let sink = Arc::clone(&count);
        store.subscribe(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        store.set_completed(&id("T01"), true);

        assert!(!store.is_completed(&id("T01")));
        assert!(store.list_completed().is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
