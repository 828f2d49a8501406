//! Multiple-choice options for initial learning mode.

use serde::{Deserialize, Serialize};

use crate::random::{shuffle, RandomSource};
use crate::types::Flashcard;

/// Outcome of picking an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub correct: bool,
    pub message: String,
    /// The card's correct answer, shown when the pick was wrong.
    pub correct_answer: String,
}

/// Correct answer plus both distractors, in random order.
pub fn generate_options<R>(card: &Flashcard, rng: &mut R) -> Vec<String>
where
    R: RandomSource + ?Sized,
{
    let mut options = Vec::with_capacity(1 + card.wrong_options.len());
    options.push(card.back.clone());
    options.extend(card.wrong_options.iter().cloned());
    shuffle(&mut options, rng);
    options
}

/// Judge a picked option by exact match against the card's answer.
pub fn judge(card: &Flashcard, option: &str) -> Feedback {
    let correct = option == card.back;
    let message = if correct {
        "Correct!".to_string()
    } else {
        format!("Incorrect. The correct answer is: {}", card.back)
    };
    Feedback {
        correct,
        message,
        correct_answer: card.back.clone(),
    }
}
