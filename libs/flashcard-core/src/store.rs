//! Key-value persistence for session snapshots.
//!
//! The scheduler never touches storage directly. Callers hand in a
//! [`SessionStore`] and use [`load_session`], [`save_session`] and
//! [`clear_session`] to move snapshots in and out of it.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Result, StoreError};
use crate::session::SessionState;
use crate::types::DeckKey;

const KEY_PREFIX: &str = "flashcards_study_state_";

/// Synchronous string key-value store scoped to this client.
pub trait SessionStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StoreError>;
    fn remove(&self, key: &str) -> std::result::Result<(), StoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> std::result::Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> std::result::Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Storage key for a deck set.
pub fn storage_key(decks: &DeckKey) -> String {
    format!("{KEY_PREFIX}{decks}")
}

/// Load a resumable snapshot.
///
/// Anything that is missing, unreadable or fails validation counts as "no
/// saved session"; it is logged and never returned as an error.
pub fn load_session<S>(store: &S, decks: &DeckKey) -> Option<SessionState>
where
    S: SessionStore + ?Sized,
{
    let key = storage_key(decks);
    let raw = match store.get(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "failed to read saved session");
            return None;
        }
    };

    let state: SessionState = match serde_json::from_str(&raw) {
        Ok(state) => state,
        Err(e) => {
            tracing::debug!(key = %key, error = %e, "discarding unreadable saved session");
            return None;
        }
    };

    if !state.is_resumable() {
        tracing::debug!(key = %key, "discarding saved session with nothing to resume");
        return None;
    }
    Some(state)
}

/// Overwrite the snapshot for a deck set.
pub fn save_session<S>(store: &S, decks: &DeckKey, state: &SessionState) -> Result<()>
where
    S: SessionStore + ?Sized,
{
    let json = serde_json::to_string(state)?;
    store.set(&storage_key(decks), &json)?;
    Ok(())
}

/// Forget the snapshot for a deck set.
pub fn clear_session<S>(store: &S, decks: &DeckKey) -> Result<()>
where
    S: SessionStore + ?Sized,
{
    store.remove(&storage_key(decks))?;
    Ok(())
}
