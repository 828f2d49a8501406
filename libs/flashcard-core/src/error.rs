//! Error types for flashcard-core.

use thiserror::Error;

use crate::types::StudyMode;

/// Result type alias using StudyError.
pub type Result<T> = std::result::Result<T, StudyError>;

/// Errors raised by the study scheduler and its persistence helpers.
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("no study session has been started")]
    NoActiveSession,

    #[error("no card is being presented")]
    NoCurrentCard,

    #[error("operation requires {expected} mode")]
    WrongMode { expected: StudyMode },

    #[error("an answer was already selected for this card")]
    AnswerLocked,

    #[error("no decks selected")]
    NoDecksSelected,

    #[error("option is not one of the presented choices: {0}")]
    UnknownOption(String),

    #[error("session store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from a key-value session store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors that can occur while parsing an import batch.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("import content must be an array of cards")]
    NotAnArray,

    #[error("card {index}: {reason}")]
    InvalidCard { index: usize, reason: String },

    #[error("empty import")]
    Empty,
}
