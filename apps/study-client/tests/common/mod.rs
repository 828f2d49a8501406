//! Common test utilities and fixtures for integration tests.
//!
//! This module provides:
//! - `FakeDecks`, an in-memory `DeckService` for driving study sessions
//! - `Backend`, an in-process HTTP deck service for exercising `HttpDeckApi`
//! - `ReadOnlyStore`, a session store that refuses every write

#![allow(dead_code)]

pub mod fixtures;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use flashcard_core::{Deck, Flashcard, FlashcardUpdate, NewFlashcard, SessionStore, StoreError};
use flashcard_study::api::{ApiError, DeckService};

// === In-memory deck service ===

#[derive(Default)]
struct FakeState {
    decks: HashMap<String, Deck>,
    cards: HashMap<String, Vec<Flashcard>>,
    failing: HashSet<String>,
    deck_lookups: usize,
    updates: usize,
    deletes: usize,
}

/// In-memory deck service with knobs for simulating server-side changes.
#[derive(Default)]
pub struct FakeDecks {
    state: Mutex<FakeState>,
}

impl FakeDecks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_deck(&self, deck: Deck, cards: Vec<Flashcard>) {
        let mut state = self.state.lock().unwrap();
        state.cards.insert(deck.id.clone(), cards);
        state.decks.insert(deck.id.clone(), deck);
    }

    /// Delete a card behind the session's back.
    pub fn remove_card(&self, deck_id: &str, card_id: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(cards) = state.cards.get_mut(deck_id) {
            cards.retain(|c| c.id != card_id);
        }
    }

    /// Edit a card behind the session's back.
    pub fn replace_card(&self, card: Flashcard) {
        let mut state = self.state.lock().unwrap();
        if let Some(cards) = state.cards.get_mut(&card.deck_id) {
            for existing in cards.iter_mut().filter(|c| c.id == card.id) {
                *existing = card.clone();
            }
        }
    }

    /// Make every request for `deck_id` fail.
    pub fn fail_deck(&self, deck_id: &str) {
        self.state.lock().unwrap().failing.insert(deck_id.to_string());
    }

    pub fn cards(&self, deck_id: &str) -> Vec<Flashcard> {
        self.state
            .lock()
            .unwrap()
            .cards
            .get(deck_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn deck_lookups(&self) -> usize {
        self.state.lock().unwrap().deck_lookups
    }

    pub fn updates(&self) -> usize {
        self.state.lock().unwrap().updates
    }

    pub fn deletes(&self) -> usize {
        self.state.lock().unwrap().deletes
    }

    fn check(&self, deck_id: &str) -> Result<(), ApiError> {
        if self.state.lock().unwrap().failing.contains(deck_id) {
            return Err(ApiError::Backend {
                status: 500,
                message: "Internal server error".into(),
            });
        }
        Ok(())
    }
}

impl DeckService for FakeDecks {
    async fn get_deck(&self, deck_id: &str) -> Result<Deck, ApiError> {
        self.check(deck_id)?;
        let mut state = self.state.lock().unwrap();
        state.deck_lookups += 1;
        state
            .decks
            .get(deck_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Deck not found".into()))
    }

    async fn list_flashcards(&self, deck_id: &str) -> Result<Vec<Flashcard>, ApiError> {
        self.check(deck_id)?;
        self.state
            .lock()
            .unwrap()
            .cards
            .get(deck_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Deck not found".into()))
    }

    async fn create_flashcard(&self, deck_id: &str, card: &NewFlashcard) -> Result<Flashcard, ApiError> {
        self.check(deck_id)?;
        let mut state = self.state.lock().unwrap();
        let cards = state
            .cards
            .get_mut(deck_id)
            .ok_or_else(|| ApiError::NotFound("Deck not found".into()))?;
        let created = Flashcard {
            id: format!("{deck_id}-{}", cards.len() + 1),
            front: card.front.clone(),
            back: card.back.clone(),
            wrong_options: card.wrong_options.clone(),
            deck_id: deck_id.to_string(),
        };
        cards.push(created.clone());
        Ok(created)
    }

    async fn update_flashcard(
        &self,
        deck_id: &str,
        card_id: &str,
        update: &FlashcardUpdate,
    ) -> Result<Flashcard, ApiError> {
        self.check(deck_id)?;
        let mut state = self.state.lock().unwrap();
        state.updates += 1;
        let card = state
            .cards
            .get_mut(deck_id)
            .and_then(|cards| cards.iter_mut().find(|c| c.id == card_id))
            .ok_or_else(|| ApiError::NotFound("Flashcard not found".into()))?;
        card.front = update.front.clone();
        card.back = update.back.clone();
        if let Some(options) = &update.wrong_options {
            card.wrong_options = options.clone();
        }
        Ok(card.clone())
    }

    async fn delete_flashcard(&self, deck_id: &str, card_id: &str) -> Result<(), ApiError> {
        self.check(deck_id)?;
        let mut state = self.state.lock().unwrap();
        state.deletes += 1;
        let cards = state
            .cards
            .get_mut(deck_id)
            .ok_or_else(|| ApiError::NotFound("Deck not found".into()))?;
        let before = cards.len();
        cards.retain(|c| c.id != card_id);
        if cards.len() == before {
            return Err(ApiError::NotFound("Flashcard not found".into()));
        }
        Ok(())
    }
}

// === Session store ===

/// Store that reads through to `S` and fails every write or removal.
pub struct ReadOnlyStore<S>(pub S);

impl<S: SessionStore> SessionStore for ReadOnlyStore<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.0.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("read-only store".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("read-only store".into()))
    }
}

// === HTTP deck service ===

#[derive(Default)]
struct BackendState {
    decks: HashMap<String, Deck>,
    cards: HashMap<String, Vec<Flashcard>>,
    next_id: usize,
    reject_front: Option<String>,
}

/// In-process deck backend speaking the `{data}` / `{error}` envelope.
#[derive(Clone, Default)]
pub struct Backend {
    inner: Arc<Mutex<BackendState>>,
}

type ApiResponse = Result<Json<Value>, (StatusCode, Json<Value>)>;

impl Backend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_deck(&self, deck: Deck, cards: Vec<Flashcard>) {
        let mut state = self.inner.lock().unwrap();
        state.cards.insert(deck.id.clone(), cards);
        state.decks.insert(deck.id.clone(), deck);
    }

    /// Refuse to create cards whose front equals `front`.
    pub fn reject_front(&self, front: &str) {
        self.inner.lock().unwrap().reject_front = Some(front.to_string());
    }

    pub fn cards(&self, deck_id: &str) -> Vec<Flashcard> {
        self.inner
            .lock()
            .unwrap()
            .cards
            .get(deck_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn remove_card(&self, deck_id: &str, card_id: &str) {
        if let Some(cards) = self.inner.lock().unwrap().cards.get_mut(deck_id) {
            cards.retain(|c| c.id != card_id);
        }
    }

    /// Serve on an ephemeral local port and return the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/api/decks/:deck_id", get(get_deck))
            .route(
                "/api/decks/:deck_id/flashcards",
                get(list_cards).post(create_card),
            )
            .route(
                "/api/decks/:deck_id/flashcards/:card_id",
                put(update_card).delete(delete_card),
            )
            .with_state(self.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

fn failure(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

/// Cards go over the wire with a Mongo-style `_id`.
fn wire(card: &Flashcard) -> Value {
    json!({
        "_id": card.id,
        "front": card.front,
        "back": card.back,
        "wrongOptions": card.wrong_options,
        "deckId": card.deck_id,
    })
}

async fn get_deck(State(backend): State<Backend>, Path(deck_id): Path<String>) -> ApiResponse {
    let state = backend.inner.lock().unwrap();
    let deck = state
        .decks
        .get(&deck_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Deck not found"))?;
    Ok(Json(json!({ "data": deck })))
}

async fn list_cards(State(backend): State<Backend>, Path(deck_id): Path<String>) -> ApiResponse {
    let state = backend.inner.lock().unwrap();
    let cards = state
        .cards
        .get(&deck_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Deck not found"))?;
    let data: Vec<Value> = cards.iter().map(wire).collect();
    Ok(Json(json!({ "data": data })))
}

async fn create_card(
    State(backend): State<Backend>,
    Path(deck_id): Path<String>,
    Json(body): Json<NewFlashcard>,
) -> ApiResponse {
    let mut state = backend.inner.lock().unwrap();
    if state.reject_front.as_deref() == Some(body.front.as_str()) {
        return Err(failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create flashcard",
        ));
    }
    state.next_id += 1;
    let card = Flashcard {
        id: format!("{deck_id}-{}", state.next_id),
        front: body.front,
        back: body.back,
        wrong_options: body.wrong_options,
        deck_id: deck_id.clone(),
    };
    let cards = state
        .cards
        .get_mut(&deck_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Deck not found"))?;
    cards.push(card.clone());
    Ok(Json(json!({ "data": wire(&card) })))
}

async fn update_card(
    State(backend): State<Backend>,
    Path((deck_id, card_id)): Path<(String, String)>,
    Json(body): Json<FlashcardUpdate>,
) -> ApiResponse {
    let mut state = backend.inner.lock().unwrap();
    let card = state
        .cards
        .get_mut(&deck_id)
        .and_then(|cards| cards.iter_mut().find(|c| c.id == card_id))
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Flashcard not found"))?;
    card.front = body.front;
    card.back = body.back;
    if let Some(options) = body.wrong_options {
        card.wrong_options = options;
    }
    Ok(Json(json!({ "data": wire(card) })))
}

async fn delete_card(
    State(backend): State<Backend>,
    Path((deck_id, card_id)): Path<(String, String)>,
) -> ApiResponse {
    let mut state = backend.inner.lock().unwrap();
    let cards = state
        .cards
        .get_mut(&deck_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Deck not found"))?;
    let before = cards.len();
    cards.retain(|c| c.id != card_id);
    if cards.len() == before {
        return Err(failure(StatusCode::NOT_FOUND, "Flashcard not found"));
    }
    Ok(Json(json!({ "data": { "deleted": true } })))
}
