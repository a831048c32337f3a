//! Worker thread lifecycle.
//!
//! [`WorkerHandle`] spawns a [`DeckWorker`] on a dedicated thread and feeds it
//! messages over an mpsc channel. Dropping the handle sends
//! [`WorkerMessage::Shutdown`] and joins the thread, so queued writes are
//! flushed before the process exits.

use super::handler::DeckWorker;
use crate::domain::error::{FlashdeckError, Result};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

#[derive(Debug)]
pub struct WorkerHandle {
    sender: Sender<WorkerMessage>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Starts the worker thread. Every response is passed to `respond`, which
    /// may be called from explanation threads as well as the worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn<R>(mut worker: DeckWorker, respond: R) -> Result<Self>
    where
        R: Fn(WorkerResponse) + Clone + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<WorkerMessage>();

        let thread = std::thread::Builder::new()
            .name("flashdeck-worker".to_string())
            .spawn(move || {
                tracing::debug!("worker thread started");
                for message in receiver {
                    if !worker.handle_message(message, &respond) {
                        break;
                    }
                }
                tracing::debug!("worker thread stopped");
            })?;

        Ok(Self {
            sender,
            thread: Some(thread),
        })
    }

    /// Queues a message for the worker.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Worker`] if the worker thread has exited.
    pub fn post(&self, message: WorkerMessage) -> Result<()> {
        tracing::debug!(operation = message.operation(), "posting message to worker");
        self.sender
            .send(message)
            .map_err(|e| FlashdeckError::Worker(format!("worker is gone: {e}")))
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        let _ = self.sender.send(WorkerMessage::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("worker thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewCard;
    use crate::storage::backend::DeckGateway;
    use crate::storage::JsonDeckStore;
    use std::time::Duration;

    #[test]
    fn drop_flushes_queued_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decks.json");

        let deck_id = {
            let mut store = JsonDeckStore::new(path.clone()).unwrap();
            store
                .save_deck(
                    "Chemistry",
                    &[NewCard {
                        term: "Ion".into(),
                        definition: "Charged atom".into(),
                    }],
                )
                .unwrap()
                .id
        };

        let (tx, rx) = mpsc::channel();
        let store = JsonDeckStore::new(path.clone()).unwrap();
        let handle = WorkerHandle::spawn(DeckWorker::new(Box::new(store), None), move |response| {
            let _ = tx.send(response);
        })
        .unwrap();

        handle.post(WorkerMessage::load_deck(deck_id.clone())).unwrap();
        let WorkerResponse::DeckLoaded { cards, .. } = rx.recv_timeout(Duration::from_secs(5)).unwrap() else {
            panic!("expected DeckLoaded");
        };

        let mut pending = crate::app::pending::PendingMutations::default();
        let mutation = pending.begin(());
        handle
            .post(WorkerMessage::update_star(mutation, cards[0].id.clone(), true))
            .unwrap();
        drop(handle);

        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            WorkerResponse::MutationCommitted { .. }
        ));
        let reopened = JsonDeckStore::new(path).unwrap();
        assert!(reopened.get_flashcards(&deck_id).unwrap()[0].is_starred);
    }
}
