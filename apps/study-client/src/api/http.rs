//! HTTP client for the deck backend.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use flashcard_core::{Deck, Flashcard, FlashcardUpdate, NewFlashcard};

use super::{ApiError, DeckService, Result};

/// Success envelope: `{ "data": ... }`.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Failure envelope: `{ "error": "message" }`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

struct HttpDeckApiInner {
    client: Client,
    base_url: String,
}

/// Deck service reached over HTTP.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct HttpDeckApi {
    inner: Arc<HttpDeckApiInner>,
}

impl HttpDeckApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            inner: Arc::new(HttpDeckApiInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Endpoint under the base URL. Each segment is percent-encoded on its
    /// own, so ids can never add path components or a query.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let invalid = || ApiError::InvalidUrl(self.inner.base_url.clone());
        let mut url = Url::parse(&self.inner.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = error_message(&body);
            if status == StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(message));
            }
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = self.send(request).await?;
        let envelope: DataEnvelope<T> = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(envelope.data)
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

impl DeckService for HttpDeckApi {
    async fn get_deck(&self, deck_id: &str) -> Result<Deck> {
        let url = self.url(&["api", "decks", deck_id])?;
        self.send_json(self.inner.client.get(url)).await
    }

    async fn list_flashcards(&self, deck_id: &str) -> Result<Vec<Flashcard>> {
        let url = self.url(&["api", "decks", deck_id, "flashcards"])?;
        self.send_json(self.inner.client.get(url)).await
    }

    async fn create_flashcard(&self, deck_id: &str, card: &NewFlashcard) -> Result<Flashcard> {
        let url = self.url(&["api", "decks", deck_id, "flashcards"])?;
        self.send_json(self.inner.client.post(url).json(card)).await
    }

    async fn update_flashcard(
        &self,
        deck_id: &str,
        card_id: &str,
        update: &FlashcardUpdate,
    ) -> Result<Flashcard> {
        let url = self.url(&["api", "decks", deck_id, "flashcards", card_id])?;
        self.send_json(self.inner.client.put(url).json(update)).await
    }

    async fn delete_flashcard(&self, deck_id: &str, card_id: &str) -> Result<()> {
        let url = self.url(&["api", "decks", deck_id, "flashcards", card_id])?;
        self.send(self.inner.client.delete(url)).await?;
        Ok(())
    }
}
