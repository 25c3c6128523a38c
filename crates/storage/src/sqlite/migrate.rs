use rusqlite::{Connection, OptionalExtension, params};

/// Runs pending schema migrations.
///
/// Version 1 creates the `kv` table holding local-storage style items.
pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    fn is_applied(conn: &Connection, version: i64) -> Result<bool, rusqlite::Error> {
        let row: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM schema_migrations WHERE version = ?1",
                params![version],
                |row| row.get(0),
            )
            .optional()?;
        Ok(row.is_some())
    }

    conn.execute_batch(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )?;

    // Version 1: key-value items.
    if !is_applied(conn, 1)? {
        conn.execute_batch(
            r"
                BEGIN;
                CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (1, datetime('now'))
                ON CONFLICT(version) DO NOTHING;
                COMMIT;
            ",
        )?;
    }

    Ok(())
}
