//! Supabase deck gateway.
//!
//! Talks to a hosted Postgres database through its PostgREST interface. Decks are
//! rows of `Materials-Table` with `type = 'FLASHCARD'`; cards are rows of
//! `flashcards` linked through `materials_fk` and ordered by `sequence`.
//!
//! Requests use the blocking `reqwest` client because the gateway runs on the
//! deck worker thread, never on the session loop.

use crate::domain::error::{FlashdeckError, Result};
use crate::domain::{DeckSummary, Flashcard, NewCard};
use crate::storage::backend::DeckGateway;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

const FLASHCARDS_TABLE: &str = "flashcards";
const MATERIALS_TABLE: &str = "Materials-Table";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Card row as returned by PostgREST.
#[derive(Debug, Deserialize)]
struct FlashcardRow {
    #[serde(deserialize_with = "id_string")]
    id: String,
    term: String,
    definition: String,
    #[serde(default)]
    is_starred: bool,
    #[serde(deserialize_with = "id_string")]
    materials_fk: String,
}

impl From<FlashcardRow> for Flashcard {
    fn from(row: FlashcardRow) -> Self {
        Self {
            id: row.id,
            term: row.term,
            definition: row.definition,
            is_starred: row.is_starred,
            deck_id: row.materials_fk,
        }
    }
}

/// Card row sent on deck creation.
#[derive(Debug, Serialize)]
struct NewFlashcardRow<'a> {
    materials_fk: &'a str,
    term: &'a str,
    definition: &'a str,
    sequence: usize,
    is_starred: bool,
}

/// Embedded `flashcards(count)` aggregate.
#[derive(Debug, Deserialize)]
struct CountRow {
    count: usize,
}

/// Material row used for deck listing and creation.
#[derive(Debug, Deserialize)]
struct MaterialRow {
    #[serde(deserialize_with = "id_string")]
    id: String,
    title: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    flashcards: Vec<CountRow>,
}

impl MaterialRow {
    fn into_summary(self, card_count: Option<usize>) -> DeckSummary {
        let created_at = self
            .created_at
            .as_deref()
            .and_then(|ts| chrono::DateTime::parse_from_rfc3339(ts).ok())
            .map_or(0, |ts| ts.timestamp());

        DeckSummary {
            card_count: card_count.unwrap_or_else(|| self.flashcards.first().map_or(0, |c| c.count)),
            id: self.id,
            title: self.title,
            created_at,
        }
    }
}

/// Accepts ids stored either as text/uuid or as integers.
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("unexpected id value: {other}"))),
    }
}

/// Deck gateway backed by Supabase's REST interface.
pub struct SupabaseGateway {
    client: Client,
    /// Project URL without trailing slash, e.g. `https://xyz.supabase.co`.
    base_url: String,
    api_key: String,
}

impl SupabaseGateway {
    /// Creates a gateway for the given project URL and API key.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Config`] if either value is empty, or
    /// [`FlashdeckError::Gateway`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        if base_url.trim().is_empty() || api_key.trim().is_empty() {
            return Err(FlashdeckError::Config(
                "supabase backend requires supabase_url and supabase_key".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FlashdeckError::Gateway(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn send(operation: &str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .map_err(|e| FlashdeckError::Gateway(format!("{operation}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        tracing::debug!(operation = operation, status = %status, body = %body, "gateway request rejected");
        Err(FlashdeckError::Gateway(format!("{operation}: HTTP {status}: {body}")))
    }

    fn patch_flashcards(&self, operation: &str, filter: (&str, String), body: &serde_json::Value) -> Result<()> {
        let request = self
            .authorized(self.client.patch(self.table_url(FLASHCARDS_TABLE)))
            .query(&[filter])
            .json(body);
        Self::send(operation, request).map(|_| ())
    }
}

impl DeckGateway for SupabaseGateway {
    fn get_flashcards(&self, deck_id: &str) -> Result<Vec<Flashcard>> {
        let _span = tracing::debug_span!("supabase_get_flashcards", deck_id = %deck_id).entered();

        let request = self
            .authorized(self.client.get(self.table_url(FLASHCARDS_TABLE)))
            .query(&[
                ("select", "*".to_string()),
                ("materials_fk", format!("eq.{deck_id}")),
                ("order", "sequence.asc".to_string()),
            ]);

        let rows: Vec<FlashcardRow> = Self::send("fetch flashcards", request)?
            .json()
            .map_err(|e| FlashdeckError::Gateway(format!("fetch flashcards: invalid body: {e}")))?;

        tracing::debug!(count = rows.len(), "retrieved flashcards");
        Ok(rows.into_iter().map(Flashcard::from).collect())
    }

    fn update_flashcard_star(&mut self, card_id: &str, is_starred: bool) -> Result<()> {
        let _span = tracing::debug_span!("supabase_update_flashcard_star", card_id = %card_id).entered();
        self.patch_flashcards(
            "update star status",
            ("id", format!("eq.{card_id}")),
            &serde_json::json!({ "is_starred": is_starred }),
        )
    }

    fn update_all_flashcards_star(&mut self, deck_id: &str, is_starred: bool) -> Result<()> {
        let _span = tracing::debug_span!("supabase_update_all_flashcards_star", deck_id = %deck_id).entered();
        self.patch_flashcards(
            "update all stars",
            ("materials_fk", format!("eq.{deck_id}")),
            &serde_json::json!({ "is_starred": is_starred }),
        )
    }

    fn update_flashcard_content(&mut self, card_id: &str, term: &str, definition: &str) -> Result<()> {
        let _span = tracing::debug_span!("supabase_update_flashcard_content", card_id = %card_id).entered();
        self.patch_flashcards(
            "update flashcard content",
            ("id", format!("eq.{card_id}")),
            &serde_json::json!({ "term": term, "definition": definition }),
        )
    }

    fn list_decks(&self) -> Result<Vec<DeckSummary>> {
        let request = self
            .authorized(self.client.get(self.table_url(MATERIALS_TABLE)))
            .query(&[
                ("select", "id,title,created_at,flashcards(count)"),
                ("type", "eq.FLASHCARD"),
                ("inTrash", "eq.false"),
                ("order", "created_at.desc"),
            ]);

        let rows: Vec<MaterialRow> = Self::send("fetch decks", request)?
            .json()
            .map_err(|e| FlashdeckError::Gateway(format!("fetch decks: invalid body: {e}")))?;

        Ok(rows.into_iter().map(|row| row.into_summary(None)).collect())
    }

    fn save_deck(&mut self, title: &str, cards: &[NewCard]) -> Result<DeckSummary> {
        let _span = tracing::debug_span!("supabase_save_deck", title = %title, count = cards.len()).entered();

        let request = self
            .authorized(self.client.post(self.table_url(MATERIALS_TABLE)))
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({ "title": title, "type": "FLASHCARD" }));

        let material = Self::send("create material", request)?
            .json::<Vec<MaterialRow>>()
            .map_err(|e| FlashdeckError::Gateway(format!("create material: invalid body: {e}")))?
            .into_iter()
            .next()
            .ok_or_else(|| FlashdeckError::Gateway("create material: empty response".to_string()))?;

        let rows: Vec<NewFlashcardRow<'_>> = cards
            .iter()
            .enumerate()
            .map(|(sequence, card)| NewFlashcardRow {
                materials_fk: &material.id,
                term: &card.term,
                definition: &card.definition,
                sequence,
                is_starred: false,
            })
            .collect();

        let request = self
            .authorized(self.client.post(self.table_url(FLASHCARDS_TABLE)))
            .json(&rows);
        Self::send("save flashcards", request)?;

        Ok(material.into_summary(Some(cards.len())))
    }

    fn delete_deck(&mut self, deck_id: &str) -> Result<()> {
        let _span = tracing::debug_span!("supabase_delete_deck", deck_id = %deck_id).entered();

        let request = self
            .authorized(self.client.delete(self.table_url(FLASHCARDS_TABLE)))
            .query(&[("materials_fk", format!("eq.{deck_id}"))]);
        Self::send("delete flashcards", request)?;

        let request = self
            .authorized(self.client.delete(self.table_url(MATERIALS_TABLE)))
            .query(&[("id", format!("eq.{deck_id}"))])
            .header("Prefer", "return=representation");
        let deleted: Vec<serde_json::Value> = Self::send("delete material", request)?
            .json()
            .map_err(|e| FlashdeckError::Gateway(format!("delete material: invalid body: {e}")))?;

        if deleted.is_empty() {
            return Err(FlashdeckError::Gateway(format!("delete material: deck not found: {deck_id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_accept_numeric_and_text_ids() {
        let rows: Vec<FlashcardRow> = serde_json::from_str(
            r#"[
                {"id": 7, "term": "Atom", "definition": "unit", "is_starred": true, "materials_fk": "m-1", "sequence": 0},
                {"id": "c2", "term": "Ion", "definition": "charged", "materials_fk": 3}
            ]"#,
        )
        .unwrap();

        let cards: Vec<Flashcard> = rows.into_iter().map(Flashcard::from).collect();
        assert_eq!(cards[0].id, "7");
        assert!(cards[0].is_starred);
        assert_eq!(cards[1].deck_id, "3");
        assert!(!cards[1].is_starred);
    }

    #[test]
    fn material_rows_use_embedded_count() {
        let rows: Vec<MaterialRow> = serde_json::from_str(
            r#"[{"id": "m-1", "title": "Cells", "created_at": "2024-05-01T10:00:00+00:00", "flashcards": [{"count": 12}]}]"#,
        )
        .unwrap();

        let summary = rows.into_iter().next().unwrap().into_summary(None);
        assert_eq!(summary.card_count, 12);
        assert_eq!(summary.created_at, 1_714_557_600);
    }

    #[test]
    fn empty_credentials_are_rejected() {
        assert!(matches!(
            SupabaseGateway::new("", "key"),
            Err(FlashdeckError::Config(_))
        ));
    }
}
