use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use thiserror::Error;
use tracing::debug;

use crate::repository::{KeyValueStore, Storage, StorageError};

mod kv_repo;
mod migrate;

/// `SQLite`-backed key-value store.
///
/// The connection sits behind a mutex so the store can be shared; every
/// operation is a single short statement.
pub struct SqliteStore {
    path: PathBuf,
    conn: Mutex<Connection>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("cannot create directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SqliteStore {
    /// Open or create a database file at `path` and apply migrations.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the parent directory cannot be created,
    /// the database cannot be opened, or migrations fail.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteInitError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| SqliteInitError::Directory {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("opening progress database at {}", path.display());
        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")?;
        migrate::run_migrations(&conn)?;
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the database cannot be created.
    pub fn open_in_memory() -> Result<Self, SqliteInitError> {
        let conn = Connection::open_in_memory()?;
        migrate::run_migrations(&conn)?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

impl Storage {
    /// Build a `Storage` backed by `SQLite`. `:memory:` opens a private
    /// in-memory database.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the database cannot be opened or migrated.
    pub fn sqlite(path: &str) -> Result<Self, SqliteInitError> {
        let store = if path == ":memory:" {
            SqliteStore::open_in_memory()?
        } else {
            SqliteStore::open(path)?
        };
        let kv: Arc<dyn KeyValueStore> = Arc::new(store);
        Ok(Self { kv })
    }
}
