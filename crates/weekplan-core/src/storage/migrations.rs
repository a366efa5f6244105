//! Database schema migrations for weekplan.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};
use tracing::{debug, warn};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist.
fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// v1: categories, tasks, the grid snapshot, and the current placement set.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    debug!("applying schema migration v1");
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS categories (
            id       TEXT PRIMARY KEY,
            name     TEXT NOT NULL,
            color    TEXT,
            context  TEXT NOT NULL DEFAULT 'other',
            purposes TEXT NOT NULL DEFAULT '[]',
            seq      INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id               TEXT PRIMARY KEY,
            title            TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            deadline         TEXT,
            context          TEXT NOT NULL,
            external_label   TEXT,
            priority         INTEGER NOT NULL DEFAULT 2,
            status           TEXT NOT NULL DEFAULT 'open',
            created_at       TEXT NOT NULL,
            seq              INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS grid (
            id    INTEGER PRIMARY KEY CHECK (id = 1),
            body  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS placements (
            seq        INTEGER PRIMARY KEY,
            task_id    TEXT NOT NULL,
            day        INTEGER NOT NULL,
            start_hour INTEGER NOT NULL,
            span_hours INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_placements_task ON placements(task_id);",
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}
