//! Core types for the study scheduler.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StudyError;
use crate::level::Level;

/// Number of distractor options every card carries.
pub const WRONG_OPTION_COUNT: usize = 2;

/// Flashcard as served by the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    #[serde(alias = "_id")]
    pub id: String,
    pub front: String,
    pub back: String,
    pub wrong_options: [String; WRONG_OPTION_COUNT],
    #[serde(default)]
    pub deck_id: String,
}

/// Deck metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(alias = "_id")]
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Deck {
    /// Whether `user_id` owns this deck.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Payload for creating a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlashcard {
    pub front: String,
    pub back: String,
    pub wrong_options: [String; WRONG_OPTION_COUNT],
}

/// Payload for editing a card. Distractors are left untouched when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardUpdate {
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrong_options: Option<[String; WRONG_OPTION_COUNT]>,
}

/// How cards are presented during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyMode {
    /// Multiple choice, advances on its own after feedback.
    InitialLearning,
    /// Flip card, the user judges their own answer.
    Review,
}

impl StudyMode {
    pub const ALL: [StudyMode; 2] = [StudyMode::InitialLearning, StudyMode::Review];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialLearning => "initial_learning",
            Self::Review => "review",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "initial_learning" => Some(Self::InitialLearning),
            "review" => Some(Self::Review),
            _ => None,
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InitialLearning => "Test mode",
            Self::Review => "Review mode",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::InitialLearning => {
                "Answer multiple-choice questions. Three options are shown and you pick the correct one."
            }
            Self::Review => {
                "Read the question, think of the answer, flip the card and judge honestly whether you knew it."
            }
        }
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-card mastery inside a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    pub level: Level,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl Default for CardState {
    fn default() -> Self {
        Self {
            level: Level::MIN,
            last_reviewed: None,
        }
    }
}

/// Identity of the deck set a session studies.
///
/// Ids are trimmed, blanks dropped, then sorted and deduplicated so the same
/// selection always maps to the same storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeckKey {
    ids: Vec<String>,
}

impl DeckKey {
    pub fn new<I, S>(ids: I) -> Result<Self, StudyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids: Vec<String> = ids
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        ids.sort();
        ids.dedup();

        if ids.is_empty() {
            return Err(StudyError::NoDecksSelected);
        }
        Ok(Self { ids })
    }

    /// Parse a comma separated list such as `a,b,c`.
    pub fn parse(list: &str) -> Result<Self, StudyError> {
        Self::new(list.split(','))
    }

    pub fn single(id: &str) -> Result<Self, StudyError> {
        Self::new([id])
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_multi(&self) -> bool {
        self.ids.len() > 1
    }
}

impl fmt::Display for DeckKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ids.join(","))
    }
}
