//! Storage record models for the JSON deck store.
//!
//! Record types are kept separate from the domain models so the on-disk format
//! can carry storage-only fields (`sequence`, `created_at`) without leaking them
//! into the study session.

use crate::domain::{DeckSummary, Flashcard};
use serde::{Deserialize, Serialize};

/// A deck as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRecord {
    /// Deck identifier (UUID v4 for decks created locally).
    pub id: String,

    /// Display title.
    pub title: String,

    /// Unix timestamp when the deck was created.
    pub created_at: i64,

    /// Cards of the deck. Returned to callers ordered by `sequence`.
    #[serde(default)]
    pub cards: Vec<FlashcardRecord>,
}

impl DeckRecord {
    /// Creates an empty deck record stamped with the current time.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            created_at: chrono::Utc::now().timestamp(),
            cards: Vec::new(),
        }
    }

    /// Builds the listing entry for this deck.
    #[must_use]
    pub fn summary(&self) -> DeckSummary {
        DeckSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            card_count: self.cards.len(),
            created_at: self.created_at,
        }
    }
}

/// A card as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardRecord {
    pub id: String,
    pub term: String,
    pub definition: String,
    #[serde(default)]
    pub is_starred: bool,
    /// Position of the card within its deck at creation time.
    pub sequence: u32,
}

impl FlashcardRecord {
    /// Converts the record into a domain card owned by `deck_id`.
    #[must_use]
    pub fn to_flashcard(&self, deck_id: &str) -> Flashcard {
        Flashcard {
            id: self.id.clone(),
            term: self.term.clone(),
            definition: self.definition.clone(),
            is_starred: self.is_starred,
            deck_id: deck_id.to_string(),
        }
    }
}
