use rusqlite::{OptionalExtension, params};

use crate::repository::{KeyValueStore, StorageError};

use super::SqliteStore;

impl KeyValueStore for SqliteStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|err| StorageError::Connection(err.to_string()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            r"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
            params![key, value],
        )
        .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
