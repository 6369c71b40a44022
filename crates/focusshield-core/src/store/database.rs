//! SQLite-backed persistent store.
//!
//! Provides:
//! - The shared key-value store (`kv` table) behind the [`Store`] trait
//! - Installed block rules (`block_rules` table, see `blocking::filter`)
//! - A history of ended focus sessions (`sessions` table)

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::{data_dir, Store};
use crate::error::StoreError;

/// One ended focus session, as recorded in the history table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Planned length in minutes.
    pub planned_min: u64,
    /// Focus time actually credited, in milliseconds.
    pub focus_ms: i64,
    /// How the session ended: "natural", "manual" or "emergencyBreak".
    pub end_reason: String,
}

/// SQLite database holding the key-value store and session history.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/focusshield/focusshield.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("focusshield.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                started_at  TEXT NOT NULL,
                ended_at    TEXT NOT NULL,
                planned_min INTEGER NOT NULL,
                focus_ms    INTEGER NOT NULL,
                end_reason  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS block_rules (
                id       INTEGER PRIMARY KEY,
                hostname TEXT NOT NULL,
                redirect TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_ended_at ON sessions(ended_at);",
        )?;
        Ok(())
    }

    /// Record an ended session to the history table.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(
        &self,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        planned_min: u64,
        focus_ms: i64,
        end_reason: &str,
    ) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO sessions (started_at, ended_at, planned_min, focus_ms, end_reason)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                started_at.to_rfc3339(),
                ended_at.to_rfc3339(),
                planned_min,
                focus_ms,
                end_reason,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent ended sessions, newest first.
    pub fn session_history(&self, limit: usize) -> Result<Vec<SessionRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, ended_at, planned_min, focus_ms, end_reason
             FROM sessions ORDER BY ended_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, started_at, ended_at, planned_min, focus_ms, end_reason) = row?;
            let started_at = DateTime::parse_from_rfc3339(&started_at)
                .map_err(|e| StoreError::QueryFailed(e.to_string()))?
                .with_timezone(&Utc);
            let ended_at = DateTime::parse_from_rfc3339(&ended_at)
                .map_err(|e| StoreError::QueryFailed(e.to_string()))?
                .with_timezone(&Utc);
            records.push(SessionRecord {
                id,
                started_at,
                ended_at,
                planned_min,
                focus_ms,
                end_reason,
            });
        }
        Ok(records)
    }
}

impl Store for Database {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
