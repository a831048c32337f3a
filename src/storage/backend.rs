//! Deck gateway abstraction.
//!
//! This module defines the [`DeckGateway`] trait that abstracts over the places a
//! deck can live: a local JSON file or the hosted Supabase database. The study
//! session never talks to a gateway directly; the worker thread owns one and
//! reports each call's outcome back as a response message.
//!
//! # Design Philosophy
//!
//! Each method maps to one persistence call the study view makes. Updates are
//! keyed by card id (or deck id for the batched star update) and return only
//! success or failure, because the session already holds the optimistic value.

use crate::domain::error::Result;
use crate::domain::{DeckSummary, Flashcard, NewCard};

/// Abstraction over deck persistence backends.
///
/// # Implementations
///
/// - [`JsonDeckStore`](crate::storage::JsonDeckStore): JSON file with atomic writes (default)
/// - [`SupabaseGateway`](crate::storage::SupabaseGateway): PostgREST over HTTPS
///
/// # Examples
///
/// ```no_run
/// use flashdeck::storage::{DeckGateway, JsonDeckStore};
/// use std::path::PathBuf;
///
/// let mut store = JsonDeckStore::new(PathBuf::from("/tmp/decks.json"))?;
/// let cards = store.get_flashcards("deck-1")?;
/// if let Some(card) = cards.first() {
///     store.update_flashcard_star(&card.id, true)?;
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait DeckGateway: Send {
    /// Fetches all cards of a deck in stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck does not exist or the read fails.
    fn get_flashcards(&self, deck_id: &str) -> Result<Vec<Flashcard>>;

    /// Sets the star flag of a single card.
    ///
    /// # Errors
    ///
    /// Returns an error if the card does not exist or the write fails.
    fn update_flashcard_star(&mut self, card_id: &str, is_starred: bool) -> Result<()>;

    /// Sets the star flag of every card in a deck in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck does not exist or the write fails.
    fn update_all_flashcards_star(&mut self, deck_id: &str, is_starred: bool) -> Result<()>;

    /// Replaces the term and definition of a card.
    ///
    /// # Errors
    ///
    /// Returns an error if the card does not exist or the write fails.
    fn update_flashcard_content(&mut self, card_id: &str, term: &str, definition: &str) -> Result<()>;

    /// Lists stored decks, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn list_decks(&self) -> Result<Vec<DeckSummary>>;

    /// Creates a deck from unsaved cards, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save_deck(&mut self, title: &str, cards: &[NewCard]) -> Result<DeckSummary>;

    /// Deletes a deck together with all of its cards.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck does not exist or the write fails.
    fn delete_deck(&mut self, deck_id: &str) -> Result<()>;
}
