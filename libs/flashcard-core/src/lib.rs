//! Core study scheduler shared by flashcard clients.
//!
//! Provides:
//! - Level model and reinsertion windows
//! - Queue scheduler with graduation and session lifecycle
//! - Reconciliation of saved sessions against the server's cards
//! - Multiple-choice option generation and judging
//! - Session persistence over an injectable key-value store
//! - Import batch parser

pub mod error;
pub mod level;
pub mod options;
pub mod parser;
pub mod random;
pub mod reconcile;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod types;

pub use error::{ImportError, Result, StoreError, StudyError};
pub use level::{
    calculate_new_position, update_level, InvalidLevel, Level, Placement, ReinsertionWindow,
};
pub use options::{generate_options, judge, Feedback};
pub use parser::parse_import;
pub use random::{shuffle, shuffled, RandomSource, RngSource, SequenceRandom};
pub use reconcile::reconcile;
pub use scheduler::{ResponseOutcome, StudyScheduler};
pub use session::{ResumeSummary, SessionPhase, SessionState};
pub use store::{clear_session, load_session, save_session, storage_key, MemoryStore, SessionStore};
pub use types::{
    CardState, Deck, DeckKey, Flashcard, FlashcardUpdate, NewFlashcard, StudyMode,
    WRONG_OPTION_COUNT,
};
