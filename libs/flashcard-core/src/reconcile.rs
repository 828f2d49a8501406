//! Reconciles a saved session against the authoritative card set.

use std::collections::HashMap;

use crate::session::SessionState;
use crate::types::Flashcard;

/// Bring a saved session in line with the cards that exist now.
///
/// Queued cards are replaced by their current version and dropped when they
/// no longer exist. Card states follow the same rule. The current card is
/// always the head of the reconciled queue, so a current card that was
/// deleted server-side is dropped like any queued card.
///
/// Returns `None` when nothing is left to study.
pub fn reconcile(saved: SessionState, authoritative: &[Flashcard]) -> Option<SessionState> {
    let by_id: HashMap<&str, &Flashcard> = authoritative
        .iter()
        .map(|card| (card.id.as_str(), card))
        .collect();

    let queue: Vec<Flashcard> = saved
        .queue
        .iter()
        .filter_map(|card| by_id.get(card.id.as_str()).map(|&c| c.clone()))
        .collect();

    if queue.is_empty() {
        return None;
    }

    let card_states = saved
        .card_states
        .into_iter()
        .filter(|(id, _)| by_id.contains_key(id.as_str()))
        .collect();

    let dropped = saved.queue.len() - queue.len();
    if dropped > 0 {
        tracing::debug!(dropped, "dropped cards missing from the server");
    }

    Some(SessionState {
        mode: saved.mode,
        current_card: queue.first().cloned(),
        queue,
        completed: saved.completed,
        card_states,
    })
}
