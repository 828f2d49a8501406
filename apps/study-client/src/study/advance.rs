//! Auto-advance timer for multiple-choice feedback.
//!
//! The timer never touches session state. It only signals, and the session
//! applies the signal when it awaits [`AutoAdvance::fired`].

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Judgment waiting to be applied once the delay elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceSignal {
    pub card_id: String,
    pub correct: bool,
}

/// Cancelable pending advance. Dropping it cancels the timer.
#[derive(Debug)]
pub struct AutoAdvance {
    card_id: String,
    handle: JoinHandle<()>,
    rx: oneshot::Receiver<AdvanceSignal>,
}

impl AutoAdvance {
    /// Start the timer. Must be called from within a tokio runtime.
    pub fn schedule(delay: Duration, card_id: impl Into<String>, correct: bool) -> Self {
        let card_id = card_id.into();
        let (tx, rx) = oneshot::channel();
        let signal = AdvanceSignal {
            card_id: card_id.clone(),
            correct,
        };
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(signal);
        });
        Self { card_id, handle, rx }
    }

    /// Card the pending judgment belongs to.
    pub fn card_id(&self) -> &str {
        &self.card_id
    }

    pub fn cancel(self) {
        self.handle.abort();
    }

    /// Wait for the delay to elapse. `None` if the timer was aborted.
    pub async fn fired(mut self) -> Option<AdvanceSignal> {
        (&mut self.rx).await.ok()
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test(start_paused = true)]
    async fn fires_after_the_delay() {
        let started = tokio::time::Instant::now();
        let pending = AutoAdvance::schedule(Duration::from_millis(2500), "c1", false);
        assert_eq!(pending.card_id(), "c1");

        let signal = pending.fired().await.unwrap();

        assert_eq!(
            signal,
            AdvanceSignal {
                card_id: "c1".into(),
                correct: false,
            }
        );
        assert!(started.elapsed() >= Duration::from_millis(2500));
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_timer_never_signals() {
        let pending = AutoAdvance::schedule(Duration::from_secs(1), "c1", true);
        pending.handle.abort();
        assert_eq!(pending.fired().await, None);
    }
}
