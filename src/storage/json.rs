//! Local deck store backed by one JSON file.
//!
//! The whole file is read once when the store opens and rewritten after
//! every mutation (to a sibling `.tmp` file, then renamed over it). That keeps
//! the on-disk file either the previous or the next complete version, which
//! is plenty for a personal collection of a few thousand cards.

use crate::domain::error::{FlashdeckError, Result};
use crate::domain::{DeckSummary, Flashcard, NewCard};
use crate::storage::backend::DeckGateway;
use crate::storage::models::{DeckRecord, FlashcardRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// On-disk document. `version` is written for later migrations and not read.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    version: u32,

    /// All stored decks, keyed by deck id.
    #[serde(default)]
    decks: HashMap<String, DeckRecord>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: 1,
            decks: HashMap::new(),
        }
    }
}

impl StorageData {
    /// Finds a card by id across all decks.
    fn card_mut(&mut self, card_id: &str) -> Result<&mut FlashcardRecord> {
        self.decks
            .values_mut()
            .flat_map(|deck| deck.cards.iter_mut())
            .find(|card| card.id == card_id)
            .ok_or_else(|| FlashdeckError::Storage(format!("flashcard not found: {card_id}")))
    }

    fn deck_mut(&mut self, deck_id: &str) -> Result<&mut DeckRecord> {
        self.decks
            .get_mut(deck_id)
            .ok_or_else(|| FlashdeckError::Storage(format!("deck not found: {deck_id}")))
    }
}

/// Deck store owned by the worker thread.
///
/// Card order within a deck is the `sequence` field, assigned on import.
/// Memory never runs ahead of the file: a mutation is applied to a copy of
/// the data, and the copy replaces the live data only once it is on disk.
///
/// ```json
/// {
///   "version": 1,
///   "decks": {
///     "6f1c...": {
///       "id": "6f1c...",
///       "title": "Cell Biology",
///       "created_at": 1700000000,
///       "cards": [
///         { "id": "a1", "term": "Mitochondria", "definition": "...", "is_starred": false, "sequence": 0 }
///       ]
///     }
///   }
/// }
/// ```
pub struct JsonDeckStore {
    file_path: PathBuf,
    data: StorageData,
}

impl JsonDeckStore {
    /// Creates or opens a JSON deck store.
    ///
    /// If the file exists, loads existing data. Otherwise starts empty; parent
    /// directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, or the file
    /// exists but cannot be read or parsed.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON deck store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty deck store");
            StorageData::default()
        };

        tracing::debug!(deck_count = data.decks.len(), "deck store initialized");

        Ok(Self { file_path, data })
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| FlashdeckError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(version = data.version, decks = data.decks.len(), "loaded deck data");

        Ok(data)
    }

    /// Writes `data` to a sibling temp file, then renames it over the store,
    /// so the file is never left half-written.
    fn write_file(&self, data: &StorageData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| FlashdeckError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.file_path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::debug!(path = ?self.file_path, "deck store saved");
        Ok(())
    }

    /// Runs `change` against a copy of the data and persists it. The copy
    /// becomes the live data only after the write succeeds; on any error the
    /// store is left exactly as it was.
    fn apply<T>(&mut self, change: impl FnOnce(&mut StorageData) -> Result<T>) -> Result<T> {
        let mut next = self.data.clone();
        let value = change(&mut next)?;

        if let Err(e) = self.write_file(&next) {
            tracing::warn!(error = %e, "deck store write failed, change discarded");
            return Err(e);
        }

        self.data = next;
        Ok(value)
    }
}

impl DeckGateway for JsonDeckStore {
    fn get_flashcards(&self, deck_id: &str) -> Result<Vec<Flashcard>> {
        let _span = tracing::debug_span!("json_get_flashcards", deck_id = %deck_id).entered();

        let deck = self
            .data
            .decks
            .get(deck_id)
            .ok_or_else(|| FlashdeckError::Storage(format!("deck not found: {deck_id}")))?;

        let mut records: Vec<&FlashcardRecord> = deck.cards.iter().collect();
        records.sort_by_key(|record| record.sequence);

        let cards: Vec<Flashcard> = records.into_iter().map(|r| r.to_flashcard(deck_id)).collect();
        tracing::debug!(count = cards.len(), "retrieved flashcards");
        Ok(cards)
    }

    fn update_flashcard_star(&mut self, card_id: &str, is_starred: bool) -> Result<()> {
        let _span = tracing::debug_span!("json_update_flashcard_star",
            card_id = %card_id,
            is_starred = is_starred
        ).entered();

        self.apply(|data| {
            data.card_mut(card_id)?.is_starred = is_starred;
            Ok(())
        })
    }

    fn update_all_flashcards_star(&mut self, deck_id: &str, is_starred: bool) -> Result<()> {
        let _span = tracing::debug_span!("json_update_all_flashcards_star",
            deck_id = %deck_id,
            is_starred = is_starred
        ).entered();

        let count = self.apply(|data| {
            let deck = data.deck_mut(deck_id)?;
            for card in &mut deck.cards {
                card.is_starred = is_starred;
            }
            Ok(deck.cards.len())
        })?;

        tracing::debug!(count = count, "deck stars updated");
        Ok(())
    }

    fn update_flashcard_content(&mut self, card_id: &str, term: &str, definition: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_update_flashcard_content", card_id = %card_id).entered();

        self.apply(|data| {
            let card = data.card_mut(card_id)?;
            card.term = term.to_string();
            card.definition = definition.to_string();
            Ok(())
        })
    }

    fn list_decks(&self) -> Result<Vec<DeckSummary>> {
        let mut decks: Vec<DeckSummary> = self.data.decks.values().map(DeckRecord::summary).collect();
        decks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.title.cmp(&b.title)));
        Ok(decks)
    }

    fn save_deck(&mut self, title: &str, cards: &[NewCard]) -> Result<DeckSummary> {
        let _span = tracing::debug_span!("json_save_deck", title = %title, count = cards.len()).entered();

        let mut deck = DeckRecord::new(uuid::Uuid::new_v4().to_string(), title);
        deck.cards = cards
            .iter()
            .zip(0u32..)
            .map(|(card, sequence)| FlashcardRecord {
                id: uuid::Uuid::new_v4().to_string(),
                term: card.term.clone(),
                definition: card.definition.clone(),
                is_starred: false,
                sequence,
            })
            .collect();

        let summary = deck.summary();
        self.apply(|data| {
            data.decks.insert(deck.id.clone(), deck);
            Ok(())
        })?;

        tracing::debug!(deck_id = %summary.id, "deck saved");
        Ok(summary)
    }

    fn delete_deck(&mut self, deck_id: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_delete_deck", deck_id = %deck_id).entered();

        let removed = self.apply(|data| {
            data.decks
                .remove(deck_id)
                .ok_or_else(|| FlashdeckError::Storage(format!("deck not found: {deck_id}")))
        })?;

        tracing::debug!(card_count = removed.cards.len(), "deck deleted with its cards");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cards() -> Vec<NewCard> {
        ["Atom", "Ion", "Isotope"]
            .iter()
            .map(|term| NewCard {
                term: (*term).to_string(),
                definition: format!("definition of {term}"),
            })
            .collect()
    }

    #[test]
    fn saved_deck_reloads_in_sequence_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decks.json");

        let summary = {
            let mut store = JsonDeckStore::new(path.clone()).unwrap();
            store.save_deck("Chemistry", &sample_cards()).unwrap()
        };
        assert_eq!(summary.card_count, 3);

        let store = JsonDeckStore::new(path).unwrap();
        let cards = store.get_flashcards(&summary.id).unwrap();
        let terms: Vec<&str> = cards.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, ["Atom", "Ion", "Isotope"]);
        assert!(cards.iter().all(|c| c.deck_id == summary.id && !c.is_starred));
    }

    #[test]
    fn star_and_content_updates_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decks.json");
        let mut store = JsonDeckStore::new(path.clone()).unwrap();
        let deck = store.save_deck("Chemistry", &sample_cards()).unwrap();
        let cards = store.get_flashcards(&deck.id).unwrap();

        store.update_flashcard_star(&cards[1].id, true).unwrap();
        store
            .update_flashcard_content(&cards[0].id, "Atom (edited)", "Smallest unit")
            .unwrap();
        drop(store);

        let reopened = JsonDeckStore::new(path).unwrap();
        let cards = reopened.get_flashcards(&deck.id).unwrap();
        assert!(cards[1].is_starred);
        assert_eq!(cards[0].term, "Atom (edited)");
        assert_eq!(cards[0].definition, "Smallest unit");
    }

    #[test]
    fn update_all_stars_covers_whole_deck() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDeckStore::new(dir.path().join("decks.json")).unwrap();
        let deck = store.save_deck("Chemistry", &sample_cards()).unwrap();

        store.update_all_flashcards_star(&deck.id, true).unwrap();
        assert!(store.get_flashcards(&deck.id).unwrap().iter().all(|c| c.is_starred));

        store.update_all_flashcards_star(&deck.id, false).unwrap();
        assert!(store.get_flashcards(&deck.id).unwrap().iter().all(|c| !c.is_starred));
    }

    #[test]
    fn unknown_ids_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDeckStore::new(dir.path().join("decks.json")).unwrap();

        assert!(store.get_flashcards("missing").is_err());
        assert!(store.update_flashcard_star("missing", true).is_err());
        assert!(store.update_all_flashcards_star("missing", true).is_err());
        assert!(store.update_flashcard_content("missing", "a", "b").is_err());
    }

    #[test]
    fn failed_write_leaves_memory_and_disk_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decks.json");
        let mut store = JsonDeckStore::new(path.clone()).unwrap();
        let deck = store.save_deck("Chemistry", &sample_cards()).unwrap();
        let cards = store.get_flashcards(&deck.id).unwrap();

        // A directory where the temp file goes makes every write fail.
        let blocker = path.with_extension("tmp");
        std::fs::create_dir(&blocker).unwrap();

        assert!(store.update_flashcard_star(&cards[0].id, true).is_err());
        assert!(store.update_all_flashcards_star(&deck.id, true).is_err());
        assert!(store.update_flashcard_content(&cards[1].id, "Ion?", "lost").is_err());
        assert!(store.delete_deck(&deck.id).is_err());
        assert_eq!(store.get_flashcards(&deck.id).unwrap(), cards);

        std::fs::remove_dir(&blocker).unwrap();
        store.update_flashcard_star(&cards[2].id, true).unwrap();
        drop(store);

        let reopened = JsonDeckStore::new(path).unwrap();
        let on_disk = reopened.get_flashcards(&deck.id).unwrap();
        assert!(!on_disk[0].is_starred);
        assert_eq!(on_disk[1].term, "Ion");
        assert!(on_disk[2].is_starred);
    }

    #[test]
    fn deleting_a_deck_removes_its_cards() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decks.json");
        let mut store = JsonDeckStore::new(path.clone()).unwrap();
        let chemistry = store.save_deck("Chemistry", &sample_cards()).unwrap();
        let physics = store.save_deck("Physics", &sample_cards()[..1]).unwrap();
        let card_id = store.get_flashcards(&chemistry.id).unwrap()[0].id.clone();

        store.delete_deck(&chemistry.id).unwrap();
        assert!(store.get_flashcards(&chemistry.id).is_err());
        assert!(store.update_flashcard_star(&card_id, true).is_err());
        assert!(store.delete_deck(&chemistry.id).is_err());
        drop(store);

        let reopened = JsonDeckStore::new(path).unwrap();
        let decks = reopened.list_decks().unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].id, physics.id);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decks.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonDeckStore::new(path).err().unwrap();
        assert!(matches!(err, FlashdeckError::Storage(_)));
    }
}
