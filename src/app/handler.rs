//! Event handling and state transition logic.
//!
//! This module implements the event handler that processes key presses, form
//! input and worker responses, translating them into session mutations and
//! action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the input loop or the worker thread
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `StudySession` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Keys**: `Key`, routed through the keyboard table and its guards
//! - **Direct commands**: `Command`, `ToggleStar`, `ToggleAllStars`
//! - **Editing**: `StartEdit`, `EditTerm`, `EditDefinition`, `SaveEdit`, `CancelEdit`
//! - **Term list**: `SearchTerms`, `NextTermPage`, `PrevTermPage`
//! - **System**: `Tick`, `Resize`, `Exit`
//!
//! `:` and `/` open a prompt in the footer. Until it is submitted or
//! cancelled every key is typed into it; a submitted line is parsed by
//! [`Event::parse_command`] and handled like any other event.
//! - **Worker**: `WorkerResponse` with typed message variants
//!
//! # Example
//!
//! ```rust
//! use flashdeck::app::{handle_event, Event, StudySession};
//! use flashdeck::app::keymap::Key;
//!
//! let mut session = StudySession::new("deck-1", Default::default());
//! let (render, actions) = handle_event(&mut session, &Event::Key(Key::Right))?;
//! assert!(!render && actions.is_empty()); // nothing loaded yet
//! # Ok::<(), flashdeck::FlashdeckError>(())
//! ```

use super::keymap::{route, Command, Key};
use super::prompt::PromptInput;
use super::state::MutationOutcome;
use crate::app::{Action, StudySession};
use crate::domain::error::Result;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input, timers, or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press, subject to the keyboard guards.
    Key(Key),

    /// A command issued directly, bypassing key routing (the guards still
    /// apply to the command itself, e.g. no explanation without a card).
    Command(Command),

    /// Toggles the star of a specific card, e.g. from the term list.
    ToggleStar {
        card_id: String,
    },

    /// The term list's "Star all" / "Unstar all" button.
    ToggleAllStars,

    /// Opens the edit form. `None` edits the card currently shown.
    StartEdit {
        card_id: Option<String>,
    },
    EditTerm(String),
    EditDefinition(String),
    SaveEdit,
    CancelEdit,

    /// Replaces the term list search query (empty clears it).
    SearchTerms(String),
    NextTermPage,
    PrevTermPage,

    /// Periodic timer used to expire toasts.
    Tick,

    /// The terminal was resized. The runtime keeps the size; the session
    /// only redraws.
    Resize {
        rows: usize,
        cols: usize,
    },

    /// Ends the session.
    Exit,

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

impl Event {
    /// Parses a submitted prompt line, sigil included.
    ///
    /// | Line | Event |
    /// |---|---|
    /// | `/<query>` | `SearchTerms` (`/` alone clears) |
    /// | `:edit` | `StartEdit` on the current card |
    /// | `:term=<text>`, `:definition=<text>` | edit form input |
    /// | `:w`, `:q` | save / cancel the edit |
    /// | `:all` | `ToggleAllStars` |
    /// | `:star <card-id>` | `ToggleStar` |
    /// | `:]`, `:[` | next / previous term page |
    /// | `:quit` | `Exit` |
    ///
    /// Returns `None` for anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use flashdeck::Event;
    ///
    /// assert_eq!(Event::parse_command("/mito"), Some(Event::SearchTerms("mito".into())));
    /// assert_eq!(Event::parse_command(":w"), Some(Event::SaveEdit));
    /// assert_eq!(Event::parse_command(":flip the card"), None);
    /// ```
    #[must_use]
    pub fn parse_command(line: &str) -> Option<Self> {
        if let Some(query) = line.strip_prefix('/') {
            return Some(Self::SearchTerms(query.trim().to_string()));
        }
        let command = line.strip_prefix(':')?.trim();

        if let Some(term) = command.strip_prefix("term=") {
            return Some(Self::EditTerm(term.to_string()));
        }
        if let Some(definition) = command.strip_prefix("definition=") {
            return Some(Self::EditDefinition(definition.to_string()));
        }
        if let Some(card_id) = command.strip_prefix("star ") {
            return Some(Self::ToggleStar {
                card_id: card_id.trim().to_string(),
            });
        }

        match command {
            "quit" | "exit" => Some(Self::Exit),
            "edit" => Some(Self::StartEdit { card_id: None }),
            "w" | "write" => Some(Self::SaveEdit),
            "q" | "cancel" => Some(Self::CancelEdit),
            "all" => Some(Self::ToggleAllStars),
            "]" | "next" => Some(Self::NextTermPage),
            "[" | "prev" => Some(Self::PrevTermPage),
            _ => None,
        }
    }
}

fn post(message: Option<WorkerMessage>) -> (bool, Vec<Action>) {
    message.map_or((false, vec![]), |message| (true, vec![Action::PostToWorker(message)]))
}

/// Applies a study command to the session.
fn apply_command(session: &mut StudySession, command: Command) -> (bool, Vec<Action>) {
    match command {
        Command::Flip => (session.flip(), vec![]),
        Command::Next => (session.next(), vec![]),
        Command::Prev => (session.prev(), vec![]),
        Command::ToggleStar => post(session.toggle_current_star()),
        Command::Shuffle => {
            session.shuffle();
            (true, vec![])
        }
        Command::ToggleMode => {
            session.toggle_mode();
            (true, vec![])
        }
        Command::ToggleStarredOnly => {
            session.toggle_starred_only();
            (true, vec![])
        }
        Command::ToggleFullScreen => {
            session.toggle_full_screen();
            (true, vec![])
        }
        Command::ExitFullScreen => (session.exit_full_screen(), vec![]),
        Command::Explain => post(session.explain_concept()),
        Command::CloseExplanation => {
            session.close_explanation();
            (true, vec![])
        }
    }
}

/// Processes an event, mutates session state, and returns actions to execute.
///
/// The returned flag tells the runtime whether the screen must be redrawn.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the runtime's error path uniform
/// with the rest of the crate.
pub fn handle_event(session: &mut StudySession, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Key(key) if session.prompt().is_some() => handle_prompt_key(session, *key),
        Event::Key(Key::Char(sigil @ (':' | '/'))) if !session.explanation().is_open => {
            session.open_prompt(*sigil);
            Ok((true, vec![]))
        }
        Event::Key(key) => {
            let Some(command) = route(*key, &session.focus_context()) else {
                tracing::trace!(key = ?key, "key not bound in current focus");
                return Ok((false, vec![]));
            };
            tracing::debug!(key = ?key, command = ?command, "key routed");
            Ok(apply_command(session, command))
        }
        Event::Command(command) => Ok(apply_command(session, *command)),
        Event::ToggleStar { card_id } => Ok(post(session.toggle_star(card_id))),
        Event::ToggleAllStars => Ok(post(session.toggle_all_stars())),
        Event::StartEdit { card_id } => {
            let started = match card_id {
                Some(card_id) => session.start_edit(card_id),
                None => session.start_edit_current(),
            };
            Ok((started, vec![]))
        }
        Event::EditTerm(term) => {
            session.update_edit_form(Some(term), None);
            Ok((true, vec![]))
        }
        Event::EditDefinition(definition) => {
            session.update_edit_form(None, Some(definition));
            Ok((true, vec![]))
        }
        Event::SaveEdit => {
            let message = session.save_edit();
            Ok((true, message.map(Action::PostToWorker).into_iter().collect()))
        }
        Event::CancelEdit => {
            session.cancel_edit();
            Ok((true, vec![]))
        }
        Event::SearchTerms(query) => {
            session.search_terms(query);
            Ok((true, vec![]))
        }
        Event::NextTermPage => Ok((session.term_page_next(), vec![])),
        Event::PrevTermPage => Ok((session.term_page_prev(), vec![])),
        Event::Tick => Ok((session.tick(chrono::Utc::now()), vec![])),
        Event::Resize { .. } => Ok((true, vec![])),
        Event::Exit => Ok((false, vec![Action::Exit])),
        Event::WorkerResponse(response) => Ok((handle_worker_response(session, response), vec![])),
    }
}

fn handle_prompt_key(session: &mut StudySession, key: Key) -> Result<(bool, Vec<Action>)> {
    match session.feed_prompt(key) {
        Some(PromptInput::Submitted(line)) => match Event::parse_command(&line) {
            Some(event) => {
                tracing::debug!(line = %line, "prompt submitted");
                let (_, actions) = handle_event(session, &event)?;
                Ok((true, actions))
            }
            None => {
                session.notify_error(format!("Unknown command: {line}"));
                Ok((true, vec![]))
            }
        },
        Some(PromptInput::Editing | PromptInput::Cancelled) => Ok((true, vec![])),
        None => Ok((false, vec![])),
    }
}

fn handle_worker_response(session: &mut StudySession, response: &WorkerResponse) -> bool {
    match response {
        WorkerResponse::DeckLoaded { deck_id, cards } => session.deck_loaded(deck_id, cards.clone()),
        WorkerResponse::DeckLoadFailed { deck_id, message } => session.load_failed(deck_id, message),
        WorkerResponse::MutationCommitted { mutation } => {
            session.settle_mutation(*mutation, MutationOutcome::Committed)
        }
        WorkerResponse::MutationFailed { mutation, message } => {
            session.settle_mutation(*mutation, MutationOutcome::Failed(message.clone()))
        }
        WorkerResponse::ExplanationChunk { request, text } => session.explanation_chunk(*request, text),
        WorkerResponse::ExplanationFinished { request } => session.explanation_finished(*request),
        WorkerResponse::ExplanationFailed { request, message } => {
            session.explanation_failed(*request, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Flashcard;

    fn loaded_session() -> StudySession {
        let mut session = StudySession::new("deck", Default::default());
        let cards = (0..3)
            .map(|i| Flashcard::new(format!("c{i}"), format!("term {i}"), format!("def {i}"), "deck"))
            .collect();
        handle_event(
            &mut session,
            &Event::WorkerResponse(WorkerResponse::DeckLoaded {
                deck_id: "deck".into(),
                cards,
            }),
        )
        .unwrap();
        session
    }

    fn single_message(actions: &[Action]) -> &WorkerMessage {
        match actions {
            [Action::PostToWorker(message)] => message,
            other => panic!("expected one worker message, got {other:?}"),
        }
    }

    #[test]
    fn star_key_posts_update_and_failure_rolls_back() {
        let mut session = loaded_session();
        let (render, actions) = handle_event(&mut session, &Event::Key(Key::Char('S'))).unwrap();
        assert!(render);

        let WorkerMessage::UpdateStar { mutation, card_id, is_starred } = single_message(&actions).clone() else {
            panic!("expected UpdateStar");
        };
        assert_eq!(card_id, "c0");
        assert!(is_starred);
        assert!(session.deck()[0].is_starred);

        let failure = Event::WorkerResponse(WorkerResponse::MutationFailed {
            mutation,
            message: "offline".into(),
        });
        assert!(handle_event(&mut session, &failure).unwrap().0);
        assert!(!session.deck()[0].is_starred);
        assert!(!session.is_updating());
    }

    #[test]
    fn editing_suppresses_shortcuts() {
        let mut session = loaded_session();
        handle_event(&mut session, &Event::StartEdit { card_id: None }).unwrap();

        let (render, actions) = handle_event(&mut session, &Event::Key(Key::Right)).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(session.current_index(), 0);

        handle_event(&mut session, &Event::EditTerm("Atom".into())).unwrap();
        let (_, actions) = handle_event(&mut session, &Event::SaveEdit).unwrap();
        assert!(matches!(single_message(&actions), WorkerMessage::UpdateContent { term, .. } if term == "Atom"));

        handle_event(&mut session, &Event::Key(Key::Right)).unwrap();
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn explanation_panel_captures_keys_until_closed() {
        let mut session = loaded_session();
        let (_, actions) = handle_event(&mut session, &Event::Key(Key::Char('e'))).unwrap();
        let WorkerMessage::Explain { request, .. } = single_message(&actions).clone() else {
            panic!("expected Explain");
        };

        handle_event(&mut session, &Event::Key(Key::Right)).unwrap();
        assert_eq!(session.current_index(), 0);

        let chunk = Event::WorkerResponse(WorkerResponse::ExplanationChunk {
            request,
            text: "Atoms are".into(),
        });
        assert!(handle_event(&mut session, &chunk).unwrap().0);
        assert!(!session.explanation().is_loading);

        handle_event(&mut session, &Event::Key(Key::Enter)).unwrap();
        assert!(!session.explanation().is_open);
        assert!(!handle_event(&mut session, &chunk).unwrap().0);
    }

    fn type_keys(session: &mut StudySession, text: &str) -> Vec<Action> {
        let mut actions = Vec::new();
        for c in text.chars() {
            let key = if c == ' ' { Key::Space } else { Key::Char(c) };
            actions.extend(handle_event(session, &Event::Key(key)).unwrap().1);
        }
        actions.extend(handle_event(session, &Event::Key(Key::Enter)).unwrap().1);
        actions
    }

    #[test]
    fn prompt_lines_map_to_events() {
        assert_eq!(Event::parse_command(":quit"), Some(Event::Exit));
        assert_eq!(Event::parse_command(":term= Atom "), Some(Event::EditTerm(" Atom".into())));
        assert_eq!(Event::parse_command("/"), Some(Event::SearchTerms(String::new())));
        assert_eq!(Event::parse_command(":]"), Some(Event::NextTermPage));
        assert_eq!(
            Event::parse_command(":star c2"),
            Some(Event::ToggleStar { card_id: "c2".into() })
        );
        assert_eq!(Event::parse_command("edit"), None);
        assert_eq!(Event::parse_command(":flip the card"), None);
    }

    #[test]
    fn edit_through_prompt_while_shortcuts_are_suppressed() {
        let mut session = loaded_session();
        assert!(type_keys(&mut session, ":edit").is_empty());
        assert_eq!(session.editing_id(), Some("c0"));
        assert!(session.prompt().is_none());

        type_keys(&mut session, ":definition=Smallest unit");
        assert_eq!(session.edit_form().definition, "Smallest unit");

        let actions = type_keys(&mut session, ":w");
        assert!(matches!(
            single_message(&actions),
            WorkerMessage::UpdateContent { definition, .. } if definition == "Smallest unit"
        ));
        assert!(session.editing_id().is_none());
    }

    #[test]
    fn prompt_swallows_study_keys_and_reports_unknown_commands() {
        let mut session = loaded_session();
        handle_event(&mut session, &Event::Key(Key::Char(':'))).unwrap();
        let (_, actions) = handle_event(&mut session, &Event::Key(Key::Char('s'))).unwrap();
        assert!(actions.is_empty());
        assert!(!session.deck()[0].is_starred);
        assert_eq!(session.prompt().map(|p| p.text().to_string()), Some(":s".into()));

        handle_event(&mut session, &Event::Key(Key::Enter)).unwrap();
        assert!(session.prompt().is_none());
        assert!(session.notifications().toasts()[0].message.contains("Unknown command: :s"));

        handle_event(&mut session, &Event::Key(Key::Char('/'))).unwrap();
        handle_event(&mut session, &Event::Key(Key::Esc)).unwrap();
        assert!(session.prompt().is_none());
        assert!(!session.is_full_screen());
    }

    #[test]
    fn search_prompt_filters_as_you_type() {
        let mut session = loaded_session();
        for key in [Key::Char('/'), Key::Char('t'), Key::Char('2')] {
            handle_event(&mut session, &Event::Key(key)).unwrap();
        }
        assert_eq!(session.term_list().query(), "t2");

        handle_event(&mut session, &Event::Key(Key::Esc)).unwrap();
        assert_eq!(session.term_list().query(), "");
    }

    #[test]
    fn toggle_all_from_term_list() {
        let mut session = loaded_session();
        let (_, actions) = handle_event(&mut session, &Event::ToggleAllStars).unwrap();
        assert!(matches!(
            single_message(&actions),
            WorkerMessage::UpdateAllStars { deck_id, is_starred: true, .. } if deck_id == "deck"
        ));

        let (_, actions) = handle_event(&mut session, &Event::Exit).unwrap();
        assert_eq!(actions, vec![Action::Exit]);
    }
}
