//! Deck service access.
//!
//! [`DeckService`] is the seam between the study session and whatever holds
//! the decks. [`HttpDeckApi`] talks to the real backend; tests plug in
//! in-memory fakes.

mod http;

use std::future::Future;
use std::sync::Arc;

use futures::future::try_join_all;

use flashcard_core::{Deck, DeckKey, Flashcard, FlashcardUpdate, NewFlashcard};

pub use http::HttpDeckApi;

/// Errors from the deck service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load deck {deck_id}: {source}")]
    Deck {
        deck_id: String,
        source: Box<ApiError>,
    },

    #[error("Import stopped after {imported} of {total} cards: {source}")]
    ImportStopped {
        imported: usize,
        total: usize,
        source: Box<ApiError>,
    },
}

/// Result type alias using ApiError.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Operations the study client needs from the deck service.
pub trait DeckService: Send + Sync {
    /// Deck metadata, including the owner.
    fn get_deck(&self, deck_id: &str) -> impl Future<Output = Result<Deck>> + Send;

    /// Every card in a deck, in no particular order.
    fn list_flashcards(&self, deck_id: &str) -> impl Future<Output = Result<Vec<Flashcard>>> + Send;

    fn create_flashcard(
        &self,
        deck_id: &str,
        card: &NewFlashcard,
    ) -> impl Future<Output = Result<Flashcard>> + Send;

    fn update_flashcard(
        &self,
        deck_id: &str,
        card_id: &str,
        update: &FlashcardUpdate,
    ) -> impl Future<Output = Result<Flashcard>> + Send;

    fn delete_flashcard(
        &self,
        deck_id: &str,
        card_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl<T: DeckService> DeckService for Arc<T> {
    fn get_deck(&self, deck_id: &str) -> impl Future<Output = Result<Deck>> + Send {
        (**self).get_deck(deck_id)
    }

    fn list_flashcards(&self, deck_id: &str) -> impl Future<Output = Result<Vec<Flashcard>>> + Send {
        (**self).list_flashcards(deck_id)
    }

    fn create_flashcard(
        &self,
        deck_id: &str,
        card: &NewFlashcard,
    ) -> impl Future<Output = Result<Flashcard>> + Send {
        (**self).create_flashcard(deck_id, card)
    }

    fn update_flashcard(
        &self,
        deck_id: &str,
        card_id: &str,
        update: &FlashcardUpdate,
    ) -> impl Future<Output = Result<Flashcard>> + Send {
        (**self).update_flashcard(deck_id, card_id, update)
    }

    fn delete_flashcard(
        &self,
        deck_id: &str,
        card_id: &str,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).delete_flashcard(deck_id, card_id)
    }
}

/// Fetch the cards of every deck in `decks` concurrently.
///
/// Each card is tagged with the deck it came from. One failing deck fails
/// the whole fetch, and the error names that deck.
pub async fn fetch_deck_set<S: DeckService>(service: &S, decks: &DeckKey) -> Result<Vec<Flashcard>> {
    let fetches = decks.ids().iter().map(|deck_id| async move {
        let mut cards = service
            .list_flashcards(deck_id)
            .await
            .map_err(|e| ApiError::Deck {
                deck_id: deck_id.clone(),
                source: Box::new(e),
            })?;
        for card in &mut cards {
            card.deck_id = deck_id.clone();
        }
        Ok::<_, ApiError>(cards)
    });

    let per_deck = try_join_all(fetches).await?;
    let cards: Vec<Flashcard> = per_deck.into_iter().flatten().collect();
    tracing::debug!(decks = %decks, cards = cards.len(), "fetched deck set");
    Ok(cards)
}

/// Create `cards` in a deck one at a time, stopping at the first failure.
///
/// Returns the number of cards created.
pub async fn import_flashcards<S: DeckService>(
    service: &S,
    deck_id: &str,
    cards: &[NewFlashcard],
) -> Result<usize> {
    for (imported, card) in cards.iter().enumerate() {
        if let Err(e) = service.create_flashcard(deck_id, card).await {
            tracing::warn!(deck_id, imported, error = %e, "import stopped");
            return Err(ApiError::ImportStopped {
                imported,
                total: cards.len(),
                source: Box::new(e),
            });
        }
    }
    tracing::info!(deck_id, imported = cards.len(), "import finished");
    Ok(cards.len())
}
