//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_AUTO_ADVANCE_MS: u64 = 2500;

const API_URL_VAR: &str = "FLASHCARDS_API_URL";
const USER_ID_VAR: &str = "FLASHCARDS_USER_ID";
const SESSION_DB_VAR: &str = "FLASHCARDS_SESSION_DB";
const AUTO_ADVANCE_VAR: &str = "FLASHCARDS_AUTO_ADVANCE_MS";
const SEED_VAR: &str = "FLASHCARDS_SEED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the deck service.
    pub api_url: String,
    /// Signed-in user. Editing and deleting cards needs one.
    pub user_id: Option<String>,
    /// SQLite file holding saved sessions.
    pub session_db: PathBuf,
    /// Delay between multiple-choice feedback and the next card.
    pub auto_advance: Duration,
    /// Fixed seed for shuffling. Entropy when unset.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_id: None,
            session_db: default_session_db(),
            auto_advance: Duration::from_millis(DEFAULT_AUTO_ADVANCE_MS),
            seed: None,
        }
    }
}

impl Config {
    /// Read settings from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let auto_advance = match var(AUTO_ADVANCE_VAR) {
            Some(raw) => Duration::from_millis(parse_number(AUTO_ADVANCE_VAR, &raw)?),
            None => defaults.auto_advance,
        };
        let seed = var(SEED_VAR)
            .map(|raw| parse_number(SEED_VAR, &raw))
            .transpose()?;

        Ok(Self {
            api_url: var(API_URL_VAR).unwrap_or(defaults.api_url),
            user_id: var(USER_ID_VAR),
            session_db: var(SESSION_DB_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.session_db),
            auto_advance,
            seed,
        })
    }
}

fn parse_number(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}

/// Session database in the user's local data directory.
pub fn default_session_db() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flashcards-study")
        .join("sessions.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.auto_advance, Duration::from_millis(2500));
        assert!(config.session_db.ends_with("flashcards-study/sessions.db"));
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            ("FLASHCARDS_API_URL", "https://cards.example.com"),
            ("FLASHCARDS_USER_ID", "user-1"),
            ("FLASHCARDS_SESSION_DB", "/tmp/s.db"),
            ("FLASHCARDS_AUTO_ADVANCE_MS", "100"),
            ("FLASHCARDS_SEED", "42"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://cards.example.com");
        assert_eq!(config.user_id.as_deref(), Some("user-1"));
        assert_eq!(config.session_db, PathBuf::from("/tmp/s.db"));
        assert_eq!(config.auto_advance, Duration::from_millis(100));
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = Config::from_lookup(lookup(&[("FLASHCARDS_USER_ID", "  ")])).unwrap();
        assert!(config.user_id.is_none());
    }

    #[test]
    fn rejects_bad_numbers() {
        let result = Config::from_lookup(lookup(&[("FLASHCARDS_AUTO_ADVANCE_MS", "soon")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidNumber { var: "FLASHCARDS_AUTO_ADVANCE_MS", .. })
        ));
    }
}
