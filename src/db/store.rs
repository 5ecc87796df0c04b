use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};

/// Key of the per-day prayer completion history.
pub const HISTORY_KEY: &str = "prayer_tracker_history";
/// Key of the tasbeeh count and selected dhikr.
pub const TASBEEH_KEY: &str = "tasbeeh_state";
/// Key of the Hijri month last shown in the calendar.
pub const LAST_MONTH_KEY: &str = "calendar_last_month";

/// Durable string key/value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> EngineResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> EngineResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> EngineResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> EngineResult<()> {
        (**self).set(key, value)
    }
}

// ─── SQLite ──────────────────────────────────────────────────────────────────

/// Key/value records in the `app_meta` table.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteStore<'_> {
    fn get(&self, key: &str) -> EngineResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM app_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| EngineError::StorageReadFailure(e.to_string()))
    }

    fn set(&mut self, key: &str, value: &str) -> EngineResult<()> {
        self.conn
            .execute(
                "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )
            .map_err(|e| EngineError::StorageWriteFailure(e.to_string()))?;
        Ok(())
    }
}

// ─── In-memory ───────────────────────────────────────────────────────────────

/// A store that lives only as long as the process; writes can be made to fail.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> EngineResult<Option<String>> {
        if self.fail_reads {
            return Err(EngineError::StorageReadFailure("read disabled".to_string()));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> EngineResult<()> {
        if self.fail_writes {
            return Err(EngineError::StorageWriteFailure("write disabled".to_string()));
        }
        self.writes += 1;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
