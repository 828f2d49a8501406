//! Persisted session state and the session lifecycle.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::{CardState, Flashcard, StudyMode};

/// Snapshot of a study session, written after every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub mode: StudyMode,
    pub queue: Vec<Flashcard>,
    #[serde(default)]
    pub current_card: Option<Flashcard>,
    #[serde(default)]
    pub completed: u32,
    pub card_states: HashMap<String, CardState>,
}

impl SessionState {
    /// Whether this snapshot can be resumed.
    ///
    /// A resumable snapshot has at least one queued card and no duplicate
    /// card ids in its queue.
    pub fn is_resumable(&self) -> bool {
        if self.queue.is_empty() {
            return false;
        }
        let mut seen = HashSet::with_capacity(self.queue.len());
        self.queue.iter().all(|card| seen.insert(card.id.as_str()))
    }

    /// Cards left to review.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Summary offered in mode selection.
    pub fn summary(&self) -> ResumeSummary {
        ResumeSummary {
            mode: self.mode,
            completed: self.completed,
            remaining: self.queue.len(),
        }
    }
}

/// What the "continue" option shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumeSummary {
    pub mode: StudyMode,
    pub completed: u32,
    pub remaining: usize,
}

/// Lifecycle of a study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing loaded yet.
    NotStarted,
    /// No mode chosen; the user picks a mode or resumes.
    ModeSelection,
    /// Cards are being presented.
    Active,
    /// Every card graduated or was removed.
    Exhausted,
    /// Torn down while cards were still queued.
    Abandoned,
}

impl SessionPhase {
    /// Whether responses can be recorded in this phase.
    pub fn accepts_responses(self) -> bool {
        matches!(self, Self::Active)
    }
}
