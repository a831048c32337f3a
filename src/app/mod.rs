//! Application layer coordinating state, events, and actions.
//!
//! This module defines the study session logic, sitting between the terminal
//! front end (main.rs) and the domain/storage/worker layers.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`explain`]: Explanation panel state
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`input`]: Raw terminal events to session events
//! - [`keymap`]: Keyboard shortcuts and the guards that suppress them
//! - [`modes`]: Front face and load state types
//! - [`notify`]: Transient toast notifications
//! - [`pending`]: Rollback snapshots for optimistic mutations
//! - [`prompt`]: Footer command and search line
//! - [`state`]: Study session state and view model computation
//! - [`term_list`]: Paginated, searchable term list
//!
//! # Example
//!
//! ```rust
//! use flashdeck::app::{handle_event, Event, StudySession};
//! use flashdeck::worker::WorkerResponse;
//! use flashdeck::Flashcard;
//!
//! let mut session = StudySession::new("deck-1", Default::default());
//! let loaded = Event::WorkerResponse(WorkerResponse::DeckLoaded {
//!     deck_id: "deck-1".into(),
//!     cards: vec![Flashcard::new("a", "Atom", "Smallest unit", "deck-1")],
//! });
//! let (render, _actions) = handle_event(&mut session, &loaded)?;
//! assert!(render);
//! # Ok::<(), flashdeck::FlashdeckError>(())
//! ```

pub mod actions;
pub mod explain;
pub mod handler;
pub mod input;
pub mod keymap;
pub mod modes;
pub mod notify;
pub mod pending;
pub mod prompt;
pub mod state;
pub mod term_list;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{FrontFace, LoadState};
pub use state::{MutationOutcome, StudySession};
