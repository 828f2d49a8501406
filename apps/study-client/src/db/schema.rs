//! SQLite schema definitions.

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Saved sessions, one row per deck-set storage key.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS study_sessions (
    storage_key TEXT PRIMARY KEY,
    state_json TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
