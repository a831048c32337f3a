//! Domain layer for flashdeck.
//!
//! Core types shared by every other layer, independent of storage backends,
//! the AI provider, or the terminal front end.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`flashcard`]: Flashcard, edit buffer and deck listing models

pub mod error;
pub mod flashcard;

pub use error::{FlashdeckError, Result};
pub use flashcard::{DeckSummary, EditForm, Flashcard, NewCard};
