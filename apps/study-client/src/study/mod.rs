//! Study session controller.
//!
//! [`StudySession`] ties the core scheduler to a deck service and a session
//! store. It owns the per-question state and the auto-advance timer, and
//! checkpoints the scheduler after every transition.

mod advance;
mod question;

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use chrono::Utc;

use flashcard_core::{
    clear_session, generate_options, load_session, reconcile, save_session, Deck, DeckKey,
    Feedback, Flashcard, FlashcardUpdate, RandomSource, ResponseOutcome, ResumeSummary, RngSource,
    SessionPhase, SessionState, SessionStore, StudyError, StudyMode, StudyScheduler,
};

use crate::api::{fetch_deck_set, DeckService};
use crate::config::DEFAULT_AUTO_ADVANCE_MS;
use crate::error::{ClientError, Result};

pub use advance::{AdvanceSignal, AutoAdvance};
pub use question::QuestionState;

/// Whether the current user may edit or delete a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPermission {
    Allowed,
    /// Signed in, but the deck belongs to someone else.
    NotOwner,
    /// Nobody is signed in.
    SignInRequired,
}

impl EditPermission {
    pub fn is_allowed(self) -> bool {
        self == Self::Allowed
    }
}

impl fmt::Display for EditPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Allowed => "editing allowed",
            Self::NotOwner => "you can only edit cards in your own decks",
            Self::SignInRequired => "sign in to edit or delete cards",
        };
        f.write_str(msg)
    }
}

/// Cards left and cards graduated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub remaining: usize,
    pub completed: u32,
}

/// One study session over a deck set.
pub struct StudySession<S, K> {
    service: S,
    store: K,
    decks: DeckKey,
    user_id: Option<String>,
    auto_advance_delay: Duration,
    rng: Box<dyn RandomSource + Send>,
    scheduler: StudyScheduler,
    question: QuestionState,
    pending: Option<AutoAdvance>,
    resumable: Option<SessionState>,
    deck_cache: HashMap<String, Deck>,
}

impl<S, K> StudySession<S, K>
where
    S: DeckService,
    K: SessionStore,
{
    pub fn new(service: S, store: K, decks: DeckKey) -> Self {
        Self {
            service,
            store,
            decks,
            user_id: None,
            auto_advance_delay: Duration::from_millis(DEFAULT_AUTO_ADVANCE_MS),
            rng: Box::new(RngSource::from_entropy()),
            scheduler: StudyScheduler::new(),
            question: QuestionState::default(),
            pending: None,
            resumable: None,
            deck_cache: HashMap::new(),
        }
    }

    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_auto_advance(mut self, delay: Duration) -> Self {
        self.auto_advance_delay = delay;
        self
    }

    pub fn with_random<R>(mut self, rng: R) -> Self
    where
        R: RandomSource + Send + 'static,
    {
        self.rng = Box::new(rng);
        self
    }

    /// Look up a saved session and enter mode selection.
    ///
    /// The saved session is reconciled against a fresh fetch. Returns the
    /// "continue" offer when something is left to resume. A failed fetch
    /// means no offer; the saved session is kept for next time.
    pub async fn open(&mut self) -> Result<Option<ResumeSummary>> {
        self.resumable = None;

        if let Some(saved) = load_session(&self.store, &self.decks) {
            match fetch_deck_set(&self.service, &self.decks).await {
                Ok(cards) => match reconcile(saved, &cards) {
                    Some(state) => self.resumable = Some(state),
                    None => {
                        tracing::info!(decks = %self.decks, "saved session has no cards left");
                        if let Err(e) = clear_session(&self.store, &self.decks) {
                            tracing::warn!(decks = %self.decks, error = %e, "failed to clear saved session");
                        }
                    }
                },
                Err(e) => {
                    tracing::warn!(decks = %self.decks, error = %e, "could not reconcile saved session");
                }
            }
        }

        self.scheduler.open_mode_selection();
        Ok(self.resume_summary())
    }

    /// The "continue" offer, if any.
    pub fn resume_summary(&self) -> Option<ResumeSummary> {
        self.resumable.as_ref().map(SessionState::summary)
    }

    /// Start a fresh session, discarding any saved one.
    ///
    /// Returns the number of cards queued.
    pub async fn start(&mut self, mode: StudyMode) -> Result<usize> {
        let cards = fetch_deck_set(&self.service, &self.decks).await?;
        if cards.is_empty() {
            return Err(ClientError::NoCards);
        }

        clear_session(&self.store, &self.decks)?;
        self.resumable = None;
        self.scheduler.start(mode, &cards, self.rng.as_mut());
        self.present();
        self.persist();
        Ok(self.scheduler.remaining())
    }

    /// Continue the reconciled saved session. Returns false if there is none.
    pub fn resume(&mut self) -> bool {
        let Some(state) = self.resumable.take() else {
            return false;
        };
        if !self.scheduler.resume(state) {
            return false;
        }
        self.present();
        self.persist();
        true
    }

    /// Pick a multiple-choice option for the current card.
    ///
    /// Locks the question and schedules the auto-advance. Needs a tokio
    /// runtime.
    pub fn select_option(&mut self, option: &str) -> Result<Feedback> {
        self.require_mode(StudyMode::InitialLearning)?;
        let card = self
            .scheduler
            .current_card()
            .ok_or(StudyError::NoCurrentCard)?;

        let feedback = self.question.select(card, option)?;
        self.pending = Some(AutoAdvance::schedule(
            self.auto_advance_delay,
            card.id.clone(),
            feedback.correct,
        ));
        Ok(feedback)
    }

    /// Whether an auto-advance is waiting to fire.
    pub fn has_pending_advance(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the pending auto-advance and apply it.
    ///
    /// Returns `None` when nothing was pending, the timer was cancelled, or
    /// the card it belongs to is no longer at the head of the queue.
    pub async fn complete_auto_advance(&mut self) -> Result<Option<ResponseOutcome>> {
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };
        let Some(signal) = pending.fired().await else {
            return Ok(None);
        };

        let still_current = self
            .scheduler
            .current_card()
            .is_some_and(|card| card.id == signal.card_id);
        if !still_current || !self.scheduler.phase().accepts_responses() {
            tracing::debug!(card_id = %signal.card_id, "ignoring stale auto-advance");
            return Ok(None);
        }

        self.apply_response(signal.correct).map(Some)
    }

    pub fn cancel_auto_advance(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }

    /// Show or hide the answer in review mode. Returns the new reveal flag.
    pub fn flip(&mut self) -> Result<bool> {
        self.require_mode(StudyMode::Review)?;
        if self.scheduler.current_card().is_none() {
            return Err(StudyError::NoCurrentCard.into());
        }
        Ok(self.question.flip())
    }

    /// Record the user's own judgment in review mode.
    pub fn judge_self(&mut self, correct: bool) -> Result<ResponseOutcome> {
        self.require_mode(StudyMode::Review)?;
        self.apply_response(correct)
    }

    /// Whether the current user may edit or delete the current card.
    ///
    /// Deck metadata is fetched on first use and cached. A failed fetch
    /// denies editing.
    pub async fn edit_permission(&mut self) -> Result<EditPermission> {
        let deck_id = self
            .scheduler
            .current_card()
            .map(|card| card.deck_id.clone())
            .ok_or(StudyError::NoCurrentCard)?;

        let Some(user_id) = self.user_id.as_deref() else {
            return Ok(EditPermission::SignInRequired);
        };

        if !self.deck_cache.contains_key(&deck_id) {
            match self.service.get_deck(&deck_id).await {
                Ok(deck) => {
                    self.deck_cache.insert(deck_id.clone(), deck);
                }
                Err(e) => {
                    tracing::warn!(deck_id = %deck_id, error = %e, "could not load deck owner");
                    return Ok(EditPermission::NotOwner);
                }
            }
        }

        let owned = self
            .deck_cache
            .get(&deck_id)
            .is_some_and(|deck| deck.is_owned_by(user_id));
        Ok(if owned {
            EditPermission::Allowed
        } else {
            EditPermission::NotOwner
        })
    }

    /// Edit the current card on the server and in the queue.
    pub async fn edit_current(&mut self, update: FlashcardUpdate) -> Result<Flashcard> {
        let current = self.require_editable().await?;

        let mut updated = match self
            .service
            .update_flashcard(&current.deck_id, &current.id, &update)
            .await
        {
            Ok(card) => card,
            Err(e) => {
                tracing::warn!(card_id = %current.id, error = %e, "failed to update card");
                return Err(e.into());
            }
        };
        if updated.deck_id.is_empty() {
            updated.deck_id = current.deck_id.clone();
        }

        self.scheduler.replace_card(&updated);
        if !self.question.is_locked() {
            self.present();
        }
        self.persist();
        tracing::info!(card_id = %updated.id, "card updated");
        Ok(updated)
    }

    /// Delete the current card on the server and drop it from the session.
    pub async fn delete_current(&mut self) -> Result<()> {
        let current = self.require_editable().await?;

        if let Err(e) = self
            .service
            .delete_flashcard(&current.deck_id, &current.id)
            .await
        {
            tracing::warn!(card_id = %current.id, error = %e, "failed to delete card");
            return Err(e.into());
        }

        self.cancel_auto_advance();
        self.scheduler.remove_card(&current.id);
        self.present();
        self.persist();
        tracing::info!(card_id = %current.id, "card deleted");
        Ok(())
    }

    /// Tear the session down. The saved session is kept for a later resume.
    pub fn close(&mut self) {
        self.cancel_auto_advance();
        self.scheduler.abandon();
    }

    pub fn decks(&self) -> &DeckKey {
        &self.decks
    }

    pub fn phase(&self) -> SessionPhase {
        self.scheduler.phase()
    }

    pub fn mode(&self) -> Option<StudyMode> {
        self.scheduler.mode()
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.scheduler.current_card()
    }

    pub fn question(&self) -> &QuestionState {
        &self.question
    }

    pub fn progress(&self) -> Progress {
        Progress {
            remaining: self.scheduler.remaining(),
            completed: self.scheduler.completed(),
        }
    }

    fn require_mode(&self, expected: StudyMode) -> std::result::Result<(), StudyError> {
        match self.scheduler.mode() {
            None => Err(StudyError::NoActiveSession),
            Some(mode) if mode != expected => Err(StudyError::WrongMode { expected }),
            Some(_) => Ok(()),
        }
    }

    async fn require_editable(&mut self) -> Result<Flashcard> {
        let permission = self.edit_permission().await?;
        if !permission.is_allowed() {
            return Err(ClientError::PermissionDenied(permission));
        }
        self.scheduler
            .current_card()
            .cloned()
            .ok_or_else(|| StudyError::NoCurrentCard.into())
    }

    fn apply_response(&mut self, correct: bool) -> Result<ResponseOutcome> {
        let outcome = self
            .scheduler
            .respond(correct, Utc::now(), self.rng.as_mut())?;
        self.present();
        self.persist();
        Ok(outcome)
    }

    /// Reset per-question state for whatever card is now at the head.
    fn present(&mut self) {
        self.cancel_auto_advance();
        let options = match (self.scheduler.mode(), self.scheduler.current_card()) {
            (Some(StudyMode::InitialLearning), Some(card)) => {
                generate_options(card, self.rng.as_mut())
            }
            _ => Vec::new(),
        };
        self.question = QuestionState::presenting(options);
    }

    fn persist(&self) {
        let Some(snapshot) = self.scheduler.snapshot() else {
            return;
        };
        if let Err(e) = save_session(&self.store, &self.decks, &snapshot) {
            tracing::warn!(decks = %self.decks, error = %e, "failed to save session");
        }
    }
}
