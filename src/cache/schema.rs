//! SQLite schema for the summary cache.

use crate::error::{ReorgError, Result};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

pub const SCHEMA_VERSION: i64 = 1;

const SUMMARIES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS summaries (
        file_hash TEXT PRIMARY KEY,
        file_type TEXT,
        summary TEXT
    );
";

pub fn open_or_create(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|source| ReorgError::Io { path: parent.to_path_buf(), source })?;
    }

    let conn = Connection::open(path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    // journal_mode returns a row, so it cannot go through execute_batch.
    let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    ensure_schema(&conn)?;
    Ok(conn)
}

pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SUMMARIES_TABLE)?;

    let current: Option<i64> =
        conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0)).ok();
    match current {
        None => {
            conn.execute("INSERT INTO schema_version(version) VALUES(?1)", [SCHEMA_VERSION])?;
        }
        Some(version) if version == SCHEMA_VERSION => {}
        Some(version) => {
            return Err(ReorgError::Internal(format!(
                "Unsupported summary cache schema version {version}; expected {SCHEMA_VERSION}"
            )));
        }
    }
    Ok(())
}
