//! Worker implementation for deck persistence and explanation streams.
//!
//! [`DeckWorker`] owns the [`DeckGateway`] and the optional [`Explainer`]. It
//! runs on the worker thread spawned by
//! [`WorkerHandle`](super::runtime::WorkerHandle), so the session loop never
//! blocks on network or disk I/O.
//!
//! Gateway operations answer with exactly one [`WorkerResponse`]. Explanation
//! requests are streamed on a thread of their own, so a slow model never holds
//! up star toggles or edits queued behind it.

use crate::ai::Explainer;
use crate::app::explain::RequestId;
use crate::domain::error::Result;
use crate::storage::backend::DeckGateway;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::sync::Arc;

/// Message shown when explanations are requested without an API key.
const EXPLAINER_MISSING: &str = "explanations are not configured (set GEMINI_API_KEY)";

/// Worker state for handling deck operations.
pub struct DeckWorker {
    gateway: Box<dyn DeckGateway>,
    explainer: Option<Arc<dyn Explainer>>,
}

impl std::fmt::Debug for DeckWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckWorker")
            .field("has_explainer", &self.explainer.is_some())
            .finish_non_exhaustive()
    }
}

impl DeckWorker {
    #[must_use]
    pub fn new(gateway: Box<dyn DeckGateway>, explainer: Option<Arc<dyn Explainer>>) -> Self {
        Self { gateway, explainer }
    }

    /// Helper for handling gateway results with consistent logging.
    fn handle_db_result<T, S, F>(operation: &str, result: Result<T>, on_success: S, on_failure: F) -> WorkerResponse
    where
        S: FnOnce(T) -> WorkerResponse,
        F: FnOnce(String) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "gateway operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "gateway operation failed");
                on_failure(format!("{operation}: {e}"))
            }
        }
    }

    fn handle_load_deck(&self, deck_id: String) -> WorkerResponse {
        Self::handle_db_result(
            "load deck",
            self.gateway.get_flashcards(&deck_id),
            |cards| {
                tracing::debug!(deck_id = %deck_id, card_count = cards.len(), "deck loaded");
                WorkerResponse::DeckLoaded {
                    deck_id: deck_id.clone(),
                    cards,
                }
            },
            |message| WorkerResponse::DeckLoadFailed {
                deck_id: deck_id.clone(),
                message,
            },
        )
    }

    /// Processes one message, delivering responses through `respond`.
    ///
    /// Returns `false` once the worker should stop.
    pub fn handle_message<R>(&mut self, message: WorkerMessage, respond: &R) -> bool
    where
        R: Fn(WorkerResponse) + Clone + Send + 'static,
    {
        let span = tracing::debug_span!("worker_handle_message", operation = message.operation());
        let _guard = span.entered();

        let operation = message.operation();
        let response = match message {
            WorkerMessage::LoadDeck { deck_id } => self.handle_load_deck(deck_id),

            WorkerMessage::UpdateStar {
                mutation,
                card_id,
                is_starred,
            } => Self::handle_db_result(
                operation,
                self.gateway.update_flashcard_star(&card_id, is_starred),
                |()| WorkerResponse::MutationCommitted { mutation },
                |message| WorkerResponse::MutationFailed { mutation, message },
            ),

            WorkerMessage::UpdateAllStars {
                mutation,
                deck_id,
                is_starred,
            } => Self::handle_db_result(
                operation,
                self.gateway.update_all_flashcards_star(&deck_id, is_starred),
                |()| WorkerResponse::MutationCommitted { mutation },
                |message| WorkerResponse::MutationFailed { mutation, message },
            ),

            WorkerMessage::UpdateContent {
                mutation,
                card_id,
                term,
                definition,
            } => Self::handle_db_result(
                operation,
                self.gateway.update_flashcard_content(&card_id, &term, &definition),
                |()| WorkerResponse::MutationCommitted { mutation },
                |message| WorkerResponse::MutationFailed { mutation, message },
            ),

            WorkerMessage::Explain {
                request,
                term,
                definition,
            } => {
                let Some(explainer) = self.explainer.clone() else {
                    respond(WorkerResponse::ExplanationFailed {
                        request,
                        message: EXPLAINER_MISSING.to_string(),
                    });
                    return true;
                };

                let stream_respond = respond.clone();
                let spawned = std::thread::Builder::new()
                    .name(format!("flashdeck-explain-{}", request.0))
                    .spawn(move || {
                        stream_explanation(explainer.as_ref(), request, &term, &definition, &stream_respond);
                    });
                if let Err(e) = spawned {
                    tracing::warn!(error = %e, "failed to spawn explanation thread");
                    respond_failed(request, &e.to_string(), respond);
                }
                return true;
            }

            WorkerMessage::Shutdown => {
                tracing::debug!("worker shutting down");
                return false;
            }
        };

        respond(response);
        true
    }
}

fn respond_failed<R: Fn(WorkerResponse)>(request: RequestId, message: &str, respond: &R) {
    respond(WorkerResponse::ExplanationFailed {
        request,
        message: message.to_string(),
    });
}

/// Runs one explanation request to completion, forwarding every chunk.
///
/// Exactly one terminal response follows the chunks: `ExplanationFinished` or
/// `ExplanationFailed`.
pub fn stream_explanation<R>(explainer: &dyn Explainer, request: RequestId, term: &str, definition: &str, respond: &R)
where
    R: Fn(WorkerResponse),
{
    let _span = tracing::debug_span!("stream_explanation", request = request.0).entered();
    let mut chunks = 0usize;

    let result = explainer.explain(term, definition, &mut |text| {
        chunks += 1;
        respond(WorkerResponse::ExplanationChunk {
            request,
            text: text.to_string(),
        });
    });

    match result {
        Ok(()) => {
            tracing::debug!(chunks = chunks, "explanation complete");
            respond(WorkerResponse::ExplanationFinished { request });
        }
        Err(e) => {
            tracing::warn!(chunks = chunks, error = %e, "explanation failed");
            respond_failed(request, &e.to_string(), respond);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pending::PendingMutations;
    use crate::domain::error::FlashdeckError;
    use crate::domain::{DeckSummary, Flashcard, NewCard};
    use crate::storage::JsonDeckStore;
    use std::sync::mpsc;
    use std::time::Duration;

    struct OfflineGateway;

    impl DeckGateway for OfflineGateway {
        fn get_flashcards(&self, _deck_id: &str) -> Result<Vec<Flashcard>> {
            Err(FlashdeckError::Gateway("offline".into()))
        }
        fn update_flashcard_star(&mut self, _card_id: &str, _is_starred: bool) -> Result<()> {
            Err(FlashdeckError::Gateway("offline".into()))
        }
        fn update_all_flashcards_star(&mut self, _deck_id: &str, _is_starred: bool) -> Result<()> {
            Err(FlashdeckError::Gateway("offline".into()))
        }
        fn update_flashcard_content(&mut self, _card_id: &str, _term: &str, _definition: &str) -> Result<()> {
            Err(FlashdeckError::Gateway("offline".into()))
        }
        fn list_decks(&self) -> Result<Vec<DeckSummary>> {
            Err(FlashdeckError::Gateway("offline".into()))
        }
        fn save_deck(&mut self, _title: &str, _cards: &[NewCard]) -> Result<DeckSummary> {
            Err(FlashdeckError::Gateway("offline".into()))
        }
        fn delete_deck(&mut self, _deck_id: &str) -> Result<()> {
            Err(FlashdeckError::Gateway("offline".into()))
        }
    }

    struct Scripted {
        chunks: Vec<&'static str>,
        fail: bool,
    }

    impl Explainer for Scripted {
        fn explain(&self, _term: &str, _definition: &str, on_chunk: &mut dyn FnMut(&str)) -> Result<()> {
            for chunk in &self.chunks {
                on_chunk(chunk);
            }
            if self.fail {
                Err(FlashdeckError::Explanation("stream reset".into()))
            } else {
                Ok(())
            }
        }
    }

    fn channel() -> (impl Fn(WorkerResponse) + Clone + Send + 'static, mpsc::Receiver<WorkerResponse>) {
        let (tx, rx) = mpsc::channel();
        (
            move |response| {
                let _ = tx.send(response);
            },
            rx,
        )
    }

    #[test]
    fn failed_writes_report_their_mutation() {
        let mut worker = DeckWorker::new(Box::new(OfflineGateway), None);
        let mut pending = PendingMutations::<()>::default();
        let mutation = pending.begin(());
        let (respond, rx) = channel();

        assert!(worker.handle_message(WorkerMessage::update_star(mutation, "c1", true), &respond));

        match rx.try_recv().unwrap() {
            WorkerResponse::MutationFailed { mutation: failed, message } => {
                assert_eq!(failed, mutation);
                assert!(message.starts_with("update star status"));
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn load_reads_from_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDeckStore::new(dir.path().join("decks.json")).unwrap();
        let deck = store
            .save_deck(
                "Biology",
                &[NewCard {
                    term: "Cell".into(),
                    definition: "Unit of life".into(),
                }],
            )
            .unwrap();

        let mut worker = DeckWorker::new(Box::new(store), None);
        let (respond, rx) = channel();
        worker.handle_message(WorkerMessage::load_deck(deck.id.clone()), &respond);

        match rx.try_recv().unwrap() {
            WorkerResponse::DeckLoaded { deck_id, cards } => {
                assert_eq!(deck_id, deck.id);
                assert_eq!(cards.len(), 1);
                assert_eq!(cards[0].term, "Cell");
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn explanation_streams_then_finishes() {
        let explainer = Arc::new(Scripted {
            chunks: vec!["Cells ", "divide."],
            fail: false,
        });
        let mut worker = DeckWorker::new(Box::new(OfflineGateway), Some(explainer));
        let (respond, rx) = channel();

        worker.handle_message(WorkerMessage::explain(RequestId(4), "Mitosis", "Cell division"), &respond);

        let received: Vec<WorkerResponse> = (0..3)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        assert_eq!(
            received,
            vec![
                WorkerResponse::ExplanationChunk {
                    request: RequestId(4),
                    text: "Cells ".into()
                },
                WorkerResponse::ExplanationChunk {
                    request: RequestId(4),
                    text: "divide.".into()
                },
                WorkerResponse::ExplanationFinished { request: RequestId(4) },
            ]
        );
    }

    #[test]
    fn broken_stream_ends_with_failure() {
        let explainer = Scripted {
            chunks: vec!["partial"],
            fail: true,
        };
        let (respond, rx) = channel();
        stream_explanation(&explainer, RequestId(1), "t", "d", &respond);

        let last = rx.try_iter().last().unwrap();
        assert!(matches!(last, WorkerResponse::ExplanationFailed { request: RequestId(1), .. }));
    }

    #[test]
    fn missing_explainer_fails_immediately() {
        let mut worker = DeckWorker::new(Box::new(OfflineGateway), None);
        let (respond, rx) = channel();
        worker.handle_message(WorkerMessage::explain(RequestId(0), "t", "d"), &respond);
        assert!(matches!(
            rx.try_recv().unwrap(),
            WorkerResponse::ExplanationFailed { message, .. } if message == EXPLAINER_MISSING
        ));
        assert!(!worker.handle_message(WorkerMessage::Shutdown, &respond));
    }
}
