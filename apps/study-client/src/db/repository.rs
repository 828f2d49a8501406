//! Repository pattern for saved sessions.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use flashcard_core::{SessionStore, StoreError};

use crate::db::error::DbError;
use crate::db::schema::{SCHEMA, SCHEMA_VERSION};

type Result<T> = std::result::Result<T, DbError>;

/// Raw access to saved session rows.
pub trait SessionRepository {
    fn get_session(&self, key: &str) -> Result<Option<String>>;
    fn save_session(&self, key: &str, state_json: &str) -> Result<()>;
    fn delete_session(&self, key: &str) -> Result<()>;
}

/// SQLite-backed session store.
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    /// Open database at path, creating it and its directory if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::initialize(conn)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }
}

impl SessionRepository for SqliteSessionStore {
    fn get_session(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT state_json FROM study_sessions WHERE storage_key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save_session(&self, key: &str, state_json: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn()?.execute(
            "INSERT INTO study_sessions (storage_key, state_json, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(storage_key) DO UPDATE SET state_json = excluded.state_json, updated_at = excluded.updated_at",
            params![key, state_json, now],
        )?;
        Ok(())
    }

    fn delete_session(&self, key: &str) -> Result<()> {
        self.conn()?.execute(
            "DELETE FROM study_sessions WHERE storage_key = ?1",
            params![key],
        )?;
        Ok(())
    }
}

impl SessionStore for SqliteSessionStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        Ok(self.get_session(key)?)
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        Ok(self.save_session(key, value)?)
    }

    fn remove(&self, key: &str) -> std::result::Result<(), StoreError> {
        Ok(self.delete_session(key)?)
    }
}
