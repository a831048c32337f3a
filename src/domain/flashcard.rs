//! Flashcard domain model.
//!
//! A [`Flashcard`] is one term/definition pair inside a deck. Cards are owned by
//! their deck, carry a stable string id that survives reordering, and can be
//! starred for focused review.

use serde::{Deserialize, Serialize};

/// A single study card.
///
/// # Fields
///
/// - `id`: Stable identifier assigned by the backing store
/// - `term`: Front-side text (a concept or a question)
/// - `definition`: Back-side text (the explanation or answer)
/// - `is_starred`: Whether the user marked the card for focused review
/// - `deck_id`: Identifier of the owning deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub term: String,
    pub definition: String,
    pub is_starred: bool,
    pub deck_id: String,
}

impl Flashcard {
    /// Creates an unstarred card.
    ///
    /// # Examples
    ///
    /// ```
    /// use flashdeck::Flashcard;
    ///
    /// let card = Flashcard::new("c1", "Mitochondria", "Powerhouse of the cell", "deck-1");
    /// assert!(!card.is_starred);
    /// ```
    pub fn new(
        id: impl Into<String>,
        term: impl Into<String>,
        definition: impl Into<String>,
        deck_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            definition: definition.into(),
            is_starred: false,
            deck_id: deck_id.into(),
        }
    }
}

/// Edit buffer for the card currently being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub term: String,
    pub definition: String,
}

impl EditForm {
    /// Seeds the buffer from an existing card.
    #[must_use]
    pub fn from_card(card: &Flashcard) -> Self {
        Self {
            term: card.term.clone(),
            definition: card.definition.clone(),
        }
    }

    /// Returns `true` when both fields contain non-whitespace text.
    ///
    /// ```
    /// use flashdeck::domain::EditForm;
    ///
    /// let form = EditForm { term: "  ".into(), definition: "x".into() };
    /// assert!(!form.is_complete());
    /// ```
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.term.trim().is_empty() && !self.definition.trim().is_empty()
    }
}

/// Listing entry for a stored deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSummary {
    pub id: String,
    pub title: String,
    pub card_count: usize,
    /// Unix timestamp of deck creation.
    pub created_at: i64,
}

/// A term/definition pair that has not been assigned an id yet.
///
/// Produced by deck import and consumed by
/// [`DeckGateway::save_deck`](crate::storage::DeckGateway::save_deck).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCard {
    pub term: String,
    pub definition: String,
}
