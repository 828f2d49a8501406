//! In-memory review queue driving a study session.
//!
//! The head of the queue is the card being presented. Every judgment takes
//! the head off, recomputes its level and either splices it back in at a
//! level-dependent distance or graduates it.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::error::{Result, StudyError};
use crate::level::{calculate_new_position, Level, Placement};
use crate::random::{shuffle, RandomSource};
use crate::session::{SessionPhase, SessionState};
use crate::types::{CardState, Flashcard, StudyMode};

/// Result of recording one judgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseOutcome {
    pub card_id: String,
    pub correct: bool,
    pub previous_level: Level,
    pub level: Level,
    pub placement: Placement,
    pub completed: u32,
    pub remaining: usize,
}

impl ResponseOutcome {
    pub fn graduated(&self) -> bool {
        self.placement == Placement::Graduated
    }
}

/// Queue scheduler for a single study session.
#[derive(Debug, Clone)]
pub struct StudyScheduler {
    phase: SessionPhase,
    mode: Option<StudyMode>,
    queue: Vec<Flashcard>,
    completed: u32,
    card_states: HashMap<String, CardState>,
}

impl Default for StudyScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl StudyScheduler {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::NotStarted,
            mode: None,
            queue: Vec::new(),
            completed: 0,
            card_states: HashMap::new(),
        }
    }

    /// Move to mode selection once saved sessions have been looked up.
    pub fn open_mode_selection(&mut self) {
        if self.mode.is_none() {
            self.phase = SessionPhase::ModeSelection;
        }
    }

    /// Start a fresh session over `cards`.
    ///
    /// Cards are shuffled into the queue and every card starts at the
    /// minimum level. Duplicate ids keep their first occurrence.
    pub fn start<R>(&mut self, mode: StudyMode, cards: &[Flashcard], rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        let mut seen = HashSet::with_capacity(cards.len());
        let mut queue: Vec<Flashcard> = cards
            .iter()
            .filter(|card| seen.insert(card.id.clone()))
            .cloned()
            .collect();
        shuffle(&mut queue, rng);

        self.card_states = queue
            .iter()
            .map(|card| (card.id.clone(), CardState::default()))
            .collect();
        self.queue = queue;
        self.mode = Some(mode);
        self.completed = 0;
        self.phase = SessionPhase::Active;
        self.refresh_phase();

        tracing::info!(mode = %mode, cards = self.queue.len(), "study session started");
    }

    /// Continue from a saved snapshot. Returns false if the snapshot has
    /// nothing to study.
    pub fn resume(&mut self, state: SessionState) -> bool {
        if !state.is_resumable() {
            return false;
        }

        self.mode = Some(state.mode);
        self.queue = state.queue;
        self.completed = state.completed;
        self.card_states = state.card_states;
        self.phase = SessionPhase::Active;
        self.refresh_phase();

        tracing::info!(
            mode = %state.mode,
            remaining = self.queue.len(),
            completed = self.completed,
            "study session resumed"
        );
        true
    }

    /// Record a judgment for the current card.
    pub fn respond<R>(
        &mut self,
        correct: bool,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<ResponseOutcome>
    where
        R: RandomSource + ?Sized,
    {
        if !self.phase.accepts_responses() {
            return Err(StudyError::NoActiveSession);
        }
        if self.queue.is_empty() {
            return Err(StudyError::NoCurrentCard);
        }

        let card = self.queue.remove(0);
        let previous_level = self
            .card_states
            .get(&card.id)
            .map(|s| s.level)
            .unwrap_or(Level::MIN);
        let level = previous_level.after(correct);

        self.card_states.insert(
            card.id.clone(),
            CardState {
                level,
                last_reviewed: Some(now),
            },
        );

        let placement = calculate_new_position(level, correct, self.queue.len(), rng);
        let card_id = card.id.clone();
        match placement {
            Placement::Requeued { position } => self.queue.insert(position, card),
            Placement::Graduated => {
                self.completed += 1;
                tracing::debug!(card_id = %card_id, completed = self.completed, "card graduated");
            }
        }
        self.refresh_phase();

        Ok(ResponseOutcome {
            card_id,
            correct,
            previous_level,
            level,
            placement,
            completed: self.completed,
            remaining: self.queue.len(),
        })
    }

    /// Swap in an edited version of a queued card. Returns whether it was queued.
    pub fn replace_card(&mut self, card: &Flashcard) -> bool {
        let mut replaced = false;
        for queued in self.queue.iter_mut().filter(|c| c.id == card.id) {
            *queued = card.clone();
            replaced = true;
        }
        replaced
    }

    /// Drop a card from the session. Returns whether it was queued.
    pub fn remove_card(&mut self, card_id: &str) -> bool {
        let before = self.queue.len();
        self.queue.retain(|c| c.id != card_id);
        self.card_states.remove(card_id);
        let removed = self.queue.len() != before;
        self.refresh_phase();
        removed
    }

    /// Tear the session down. Queued cards stay untouched.
    pub fn abandon(&mut self) {
        if self.phase == SessionPhase::Active {
            self.phase = SessionPhase::Abandoned;
        }
    }

    /// Snapshot for persistence, if a mode has been chosen.
    pub fn snapshot(&self) -> Option<SessionState> {
        let mode = self.mode?;
        Some(SessionState {
            mode,
            queue: self.queue.clone(),
            current_card: self.queue.first().cloned(),
            completed: self.completed,
            card_states: self.card_states.clone(),
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn mode(&self) -> Option<StudyMode> {
        self.mode
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.queue.first()
    }

    pub fn queue(&self) -> &[Flashcard] {
        &self.queue
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn card_state(&self, card_id: &str) -> Option<&CardState> {
        self.card_states.get(card_id)
    }

    fn refresh_phase(&mut self) {
        if self.mode.is_none() || self.phase == SessionPhase::Abandoned {
            return;
        }
        self.phase = if self.queue.is_empty() {
            SessionPhase::Exhausted
        } else {
            SessionPhase::Active
        };
    }
}
