//! Client error types.

use thiserror::Error;

use flashcard_core::{ImportError, StudyError};

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::db::DbError;
use crate::study::EditPermission;

/// Result type alias using ClientError.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Aggregate error for everything the client can run into.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Study(#[from] StudyError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("database error: {0}")]
    Db(#[from] DbError),

    #[error("import rejected: {0}")]
    Import(#[from] ImportError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("no cards found in the selected decks")]
    NoCards,

    #[error("{0}")]
    PermissionDenied(EditPermission),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
