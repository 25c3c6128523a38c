#![forbid(unsafe_code)]

pub mod progress;
pub mod repository;
pub mod sqlite;

pub use progress::{CompletionMap, LocalProgress, PROGRESS_STORAGE_KEY, ProgressBackend};
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
