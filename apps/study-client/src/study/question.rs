//! Per-question presentation state.

use flashcard_core::{judge, Feedback, Flashcard, StudyError};

/// What the user sees and has done for the card at the head of the queue.
///
/// Reset every time a new card is presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionState {
    options: Vec<String>,
    selected: Option<String>,
    feedback: Option<Feedback>,
    revealed: bool,
}

impl QuestionState {
    /// Fresh state for a newly presented card.
    pub fn presenting(options: Vec<String>) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Shuffled choices, empty in review mode.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_locked(&self) -> bool {
        self.selected.is_some()
    }

    /// Pick an option and judge it. Only the first pick counts.
    pub(crate) fn select(&mut self, card: &Flashcard, option: &str) -> Result<Feedback, StudyError> {
        if self.is_locked() {
            return Err(StudyError::AnswerLocked);
        }
        if !self.options.iter().any(|o| o == option) {
            return Err(StudyError::UnknownOption(option.to_string()));
        }

        let feedback = judge(card, option);
        self.selected = Some(option.to_string());
        self.feedback = Some(feedback.clone());
        Ok(feedback)
    }

    pub(crate) fn flip(&mut self) -> bool {
        self.revealed = !self.revealed;
        self.revealed
    }
}
