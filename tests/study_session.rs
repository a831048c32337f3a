//! End-to-end study session against a JSON deck store, with the real worker
//! thread in between.

use flashdeck::app::keymap::Key;
use flashdeck::domain::NewCard;
use flashdeck::storage::{DeckGateway, JsonDeckStore};
use flashdeck::worker::{DeckWorker, WorkerHandle, WorkerResponse};
use flashdeck::{handle_event, initialize, Action, Config, Event, StudySession};
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

struct Harness {
    session: StudySession,
    handle: WorkerHandle,
    responses: Receiver<WorkerResponse>,
}

impl Harness {
    fn start(store_path: &Path, deck_id: &str) -> Self {
        let (tx, responses) = mpsc::channel();
        let store = JsonDeckStore::new(store_path.to_path_buf()).unwrap();
        let handle = WorkerHandle::spawn(DeckWorker::new(Box::new(store), None), move |response| {
            let _ = tx.send(response);
        })
        .unwrap();

        let (session, actions) = initialize(&Config::default(), deck_id);
        let mut harness = Self {
            session,
            handle,
            responses,
        };
        harness.run(actions);
        harness.settle();
        harness
    }

    fn run(&mut self, actions: Vec<Action>) {
        for action in actions {
            if let Action::PostToWorker(message) = action {
                self.handle.post(message).unwrap();
            }
        }
    }

    fn send(&mut self, event: Event) {
        let (_, actions) = handle_event(&mut self.session, &event).unwrap();
        self.run(actions);
    }

    /// Feeds the next worker response back into the session.
    fn settle(&mut self) {
        let response = self.responses.recv_timeout(Duration::from_secs(5)).unwrap();
        self.send(Event::WorkerResponse(response));
    }
}

fn seed(path: &Path) -> String {
    let mut store = JsonDeckStore::new(path.to_path_buf()).unwrap();
    let cards: Vec<NewCard> = [("Atom", "Smallest unit of matter"), ("Ion", "Charged atom"), ("Isotope", "Same element, different neutrons")]
        .iter()
        .map(|(term, definition)| NewCard {
            term: (*term).to_string(),
            definition: (*definition).to_string(),
        })
        .collect();
    store.save_deck("Chemistry", &cards).unwrap().id
}

#[test]
fn stars_and_edits_reach_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("decks.json");
    let deck_id = seed(&path);

    let mut harness = Harness::start(&path, &deck_id);
    assert_eq!(harness.session.active_len(), 3);

    harness.send(Event::Key(Key::Right));
    harness.send(Event::Key(Key::Char('S')));
    assert!(harness.session.is_updating());
    harness.settle();
    assert!(!harness.session.is_updating());

    harness.send(Event::StartEdit { card_id: None });
    harness.send(Event::EditDefinition("An atom with a net charge".into()));
    harness.send(Event::SaveEdit);
    assert!(harness.session.editing_id().is_none());
    harness.settle();

    harness.send(Event::Key(Key::Char('q')));
    assert_eq!(harness.session.active_len(), 1);
    assert_eq!(harness.session.current_card().unwrap().term, "Ion");

    drop(harness);

    let store = JsonDeckStore::new(path).unwrap();
    let cards = store.get_flashcards(&deck_id).unwrap();
    assert!(cards[1].is_starred);
    assert_eq!(cards[1].definition, "An atom with a net charge");
    assert!(!cards[0].is_starred && !cards[2].is_starred);
}

#[test]
fn star_all_then_unstar_all() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("decks.json");
    let deck_id = seed(&path);

    let mut harness = Harness::start(&path, &deck_id);
    harness.send(Event::ToggleAllStars);
    harness.settle();
    assert!(harness.session.all_starred());

    harness.send(Event::ToggleAllStars);
    harness.settle();
    assert!(harness.session.deck().iter().all(|card| !card.is_starred));
}

#[test]
fn unknown_deck_shows_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("decks.json");
    seed(&path);

    let harness = Harness::start(&path, "no-such-deck");
    let frame = flashdeck::ui::render(&harness.session, 24, 80);
    assert!(frame.contains("Failed to load flashcards"));
    assert!(frame.contains("deck not found"));
}

#[test]
fn explanation_without_key_fails_gracefully() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("decks.json");
    let deck_id = seed(&path);

    let mut harness = Harness::start(&path, &deck_id);
    harness.send(Event::Key(Key::Char('e')));
    assert!(harness.session.explanation().is_loading);
    harness.settle();

    let explanation = harness.session.explanation();
    assert!(explanation.is_open);
    assert!(!explanation.is_loading);
    assert_eq!(explanation.error.as_deref(), Some("Failed to generate explanation. Please try again."));
}
