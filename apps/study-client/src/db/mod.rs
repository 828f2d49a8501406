//! Local SQLite storage for saved study sessions.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{SessionRepository, SqliteSessionStore};
