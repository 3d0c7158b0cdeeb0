//! Content-addressed summary store.

use crate::domain::{Fingerprint, SummaryRecord};
use crate::error::{ReorgError, Result};
use crate::utils::hash_file;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Maps content fingerprints to `(kind, summary)`.
///
/// One handle is opened at startup and shared (usually behind an `Arc`) by
/// every component that reads or writes summaries. The connection is
/// serialized internally, so writes to the same key never interleave.
pub struct SummaryCache {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SummaryCache {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = super::schema::open_or_create(path)?;
        tracing::debug!("opened summary cache at {}", path.display());
        Ok(Self { conn: Mutex::new(conn), path: Some(path.to_path_buf()) })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        super::schema::ensure_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn), path: None })
    }

    /// Backing file, `None` for in-memory caches.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn lookup(&self, fingerprint: &Fingerprint) -> Result<Option<SummaryRecord>> {
        if fingerprint.is_empty() {
            return Ok(None);
        }

        let conn = self.conn();
        let record = conn
            .query_row(
                "SELECT file_type, summary FROM summaries WHERE file_hash = ?1",
                params![fingerprint.as_str()],
                |row| {
                    Ok(SummaryRecord {
                        fingerprint: fingerprint.clone(),
                        kind: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                        summary: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Insert or fully replace the record for `fingerprint`.
    pub fn upsert(&self, fingerprint: &Fingerprint, kind: &str, summary: &str) -> Result<()> {
        if fingerprint.is_empty() {
            return Err(ReorgError::BadRequest(
                "Cannot cache a summary without a content fingerprint".to_string(),
            ));
        }

        let conn = self.conn();
        conn.execute(
            "
            INSERT INTO summaries (file_hash, file_type, summary)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(file_hash) DO UPDATE SET
                file_type = excluded.file_type,
                summary = excluded.summary
            ",
            params![fingerprint.as_str(), kind, summary],
        )?;
        tracing::debug!("cached summary for {}", fingerprint);
        Ok(())
    }

    /// Cached summary for whatever is currently stored at `path`, or `""`.
    pub fn summary_for_path(&self, path: &Path) -> Result<String> {
        let fingerprint = hash_file(path)?;
        Ok(self.lookup(&fingerprint)?.map(|record| record.summary).unwrap_or_default())
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 =
            self.conn().query_row("SELECT COUNT(*) FROM summaries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Flush and release the connection.
    pub fn close(self) -> Result<()> {
        let conn = self.conn.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        conn.close().map_err(|(_, err)| ReorgError::Cache(err))
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
