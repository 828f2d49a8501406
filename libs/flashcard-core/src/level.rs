//! Mastery levels and the level-dependent reinsertion windows.
//!
//! A card answered correctly climbs one level, a miss drops it one level.
//! The level decides how far back in the remaining queue the card is put:
//!
//! | level | positions |
//! |-------|-----------|
//! | 1     | 2..=4     |
//! | 2     | 5..=8     |
//! | 3     | 9..=12    |
//!
//! A correct answer that lands a card on the top level graduates it: the
//! card leaves the queue for the rest of the session. The level 3 window is
//! therefore only a fallback and never used by a judgment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::random::RandomSource;

/// Mastery level, always within `Level::MIN..=Level::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

#[derive(Debug, Error)]
#[error("level {0} is outside 1..=3")]
pub struct InvalidLevel(pub u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(3);

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }

    /// Level after a judgment, clamped to the valid range.
    pub fn after(self, correct: bool) -> Self {
        if correct {
            Self(self.0.saturating_add(1).min(Self::MAX.0))
        } else {
            Self(self.0.saturating_sub(1).max(Self::MIN.0))
        }
    }

    /// Reinsertion window for a card sitting at this level.
    pub fn window(self) -> ReinsertionWindow {
        match self.0 {
            1 => ReinsertionWindow { min: 2, max: 4 },
            2 => ReinsertionWindow { min: 5, max: 8 },
            _ => ReinsertionWindow { min: 9, max: 12 },
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u8> for Level {
    type Error = InvalidLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidLevel(value))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

/// Compute the level after a judgment.
pub fn update_level(level: Level, correct: bool) -> Level {
    level.after(correct)
}

/// Inclusive range of target positions in the remaining queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReinsertionWindow {
    pub min: usize,
    pub max: usize,
}

impl ReinsertionWindow {
    /// Window bounds once clamped to a queue of `len` remaining cards.
    pub fn clamped(&self, len: usize) -> (usize, usize) {
        (self.min.min(len), self.max.min(len))
    }
}

/// Where a judged card ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The card left the queue for good.
    Graduated,
    /// The card goes back in at `position` of the remaining queue.
    Requeued { position: usize },
}

/// Decide the placement of a card whose level after the judgment is `level`.
///
/// `remaining` is the queue length after the card itself was taken off the
/// head. The drawn position is clamped to it so short queues just append.
pub fn calculate_new_position<R>(
    level: Level,
    correct: bool,
    remaining: usize,
    rng: &mut R,
) -> Placement
where
    R: RandomSource + ?Sized,
{
    if level.is_max() && correct {
        return Placement::Graduated;
    }

    let window = level.window();
    let drawn = rng.next_in_range(window.min, window.max);
    Placement::Requeued {
        position: drawn.min(remaining),
    }
}
