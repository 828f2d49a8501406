//! Test fixtures and factory functions for creating test data.

use flashcard_core::{Deck, Flashcard, NewFlashcard};

pub const OWNER: &str = "user-owner";
pub const STRANGER: &str = "user-stranger";

/// Card `id` in `deck_id` with predictable text.
pub fn card(deck_id: &str, id: &str) -> Flashcard {
    Flashcard {
        id: id.to_string(),
        front: format!("Question {id}?"),
        back: format!("Answer {id}"),
        wrong_options: [format!("Wrong {id} 1"), format!("Wrong {id} 2")],
        deck_id: deck_id.to_string(),
    }
}

/// Cards with the given ids in `deck_id`.
pub fn cards(deck_id: &str, ids: &[&str]) -> Vec<Flashcard> {
    ids.iter().map(|id| card(deck_id, id)).collect()
}

/// Deck owned by `user_id`.
pub fn deck(id: &str, user_id: &str) -> Deck {
    Deck {
        id: id.to_string(),
        user_id: user_id.to_string(),
        name: format!("Deck {id}"),
        description: String::new(),
    }
}

pub fn new_card(front: &str, back: &str) -> NewFlashcard {
    NewFlashcard {
        front: front.to_string(),
        back: back.to_string(),
        wrong_options: [format!("not {back}"), format!("never {back}")],
    }
}

/// Ids of `cards`, in order.
pub fn ids(cards: &[Flashcard]) -> Vec<String> {
    cards.iter().map(|c| c.id.clone()).collect()
}
