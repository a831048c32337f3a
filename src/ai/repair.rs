//! Repair of JSON emitted by language models.
//!
//! Models asked for a deck as JSON tend to wrap it in prose or code fences, use
//! typographic quotes, leave comments, forget to quote keys, or leave trailing
//! commas. [`clean_json_string`] fixes those before parsing.
//!
//! The rewrite is pattern based, not a parser: a `//` inside a string value
//! (such as a URL) is treated as a comment, and `word:` inside a value reads
//! as a bare key. [`parse_generated_deck`] therefore only repairs text that
//! does not already parse.

use crate::domain::error::{FlashdeckError, Result};
use crate::domain::NewCard;
use regex::Regex;
use serde::Deserialize;

/// Deck as produced by a model or written by hand for import.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedDeck {
    #[serde(default)]
    pub title: Option<String>,
    pub flashcards: Vec<NewCard>,
}

/// Cleans model output so it parses as JSON.
///
/// Steps, in order:
///
/// 1. Keep only the text from the first `{` to the last `}` (returned
///    unchanged when either is missing)
/// 2. Remove byte-order marks and zero-width or line-separator characters
/// 3. Replace typographic double and single quotes with ASCII ones
/// 4. Remove `//` line comments and `/* */` block comments
/// 5. Quote single-quoted and bare object keys
/// 6. Drop commas directly before `}` or `]`
///
/// # Errors
///
/// Returns [`FlashdeckError::Regex`] if a rewrite pattern fails to compile.
///
/// # Examples
///
/// ```
/// use flashdeck::ai::clean_json_string;
///
/// let raw = "Here you go:\n```json\n{title: 'Cells', 'flashcards': [],}\n```";
/// assert_eq!(clean_json_string(raw)?, r#"{"title": 'Cells', "flashcards": []}"#);
/// # Ok::<(), flashdeck::FlashdeckError>(())
/// ```
pub fn clean_json_string(text: &str) -> Result<String> {
    let Some(object) = outer_object(text) else {
        return Ok(text.to_string());
    };

    let invisible = Regex::new(r"[\x{FEFF}\x{200B}-\x{200F}\x{2028}\x{2029}]")?;
    let line_comment = Regex::new(r"(?m)//.*$")?;
    let block_comment = Regex::new(r"(?s)/\*.*?\*/")?;
    let single_quoted_key = Regex::new(r"([{,]\s*)'([a-zA-Z0-9_]+?)'\s*:")?;
    let bare_key = Regex::new(r"([{,]\s*)([a-zA-Z0-9_]+?)\s*:")?;
    let trailing_comma = Regex::new(r",(\s*[}\]])")?;

    let clean = object;
    let clean = invisible.replace_all(clean, "");
    let clean = clean
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");
    let clean = line_comment.replace_all(&clean, "");
    let clean = block_comment.replace_all(&clean, "");
    let clean = single_quoted_key.replace_all(&clean, "${1}\"${2}\":");
    let clean = bare_key.replace_all(&clean, "${1}\"${2}\":");
    let clean = trailing_comma.replace_all(&clean, "${1}");

    Ok(clean.into_owned())
}

/// Text from the first `{` to the last `}`, if both exist in that order.
fn outer_object(text: &str) -> Option<&str> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;
    text.get(first..=last)
}

/// Parses a generated deck, trimming every field.
///
/// Valid JSON (bare, or wrapped in prose or fences) is parsed as is;
/// [`clean_json_string`] runs only when that fails.
///
/// # Errors
///
/// Returns [`FlashdeckError::Validation`] if the repaired text is not a deck
/// object, the deck has no cards, or any card has a blank term or definition.
pub fn parse_generated_deck(raw: &str) -> Result<GeneratedDeck> {
    let strict = outer_object(raw).and_then(|object| serde_json::from_str::<GeneratedDeck>(object).ok());
    let mut deck = match strict {
        Some(deck) => deck,
        None => {
            tracing::debug!("deck is not valid JSON, repairing");
            let cleaned = clean_json_string(raw)?;
            serde_json::from_str(&cleaned)
                .map_err(|e| FlashdeckError::Validation(format!("invalid deck JSON: {e}")))?
        }
    };

    if deck.flashcards.is_empty() {
        return Err(FlashdeckError::Validation("deck contains no flashcards".to_string()));
    }

    for (index, card) in deck.flashcards.iter_mut().enumerate() {
        card.term = card.term.trim().to_string();
        card.definition = card.definition.trim().to_string();
        if card.term.is_empty() || card.definition.is_empty() {
            return Err(FlashdeckError::Validation(format!(
                "flashcard {} has an empty term or definition",
                index + 1
            )));
        }
    }

    deck.title = deck
        .title
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty());

    tracing::debug!(cards = deck.flashcards.len(), "parsed generated deck");
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prose_and_code_fences() {
        let raw = "Sure! Here is your deck:\n```json\n{\"title\": \"Cells\", \"flashcards\": []}\n```\nEnjoy.";
        assert_eq!(
            clean_json_string(raw).unwrap(),
            "{\"title\": \"Cells\", \"flashcards\": []}"
        );
    }

    #[test]
    fn text_without_braces_is_returned_unchanged() {
        assert_eq!(clean_json_string("no json here").unwrap(), "no json here");
        assert_eq!(clean_json_string("} backwards {").unwrap(), "} backwards {");
    }

    #[test]
    fn normalizes_quotes_and_invisible_characters() {
        let raw = "\u{FEFF}{\u{201C}title\u{201D}: \u{201C}Ions\u{200B}\u{201D}}";
        assert_eq!(clean_json_string(raw).unwrap(), "{\"title\": \"Ions\"}");
    }

    #[test]
    fn removes_comments_and_trailing_commas() {
        let raw = "{\n  \"title\": \"Atoms\", // the title\n  /* cards follow */\n  \"flashcards\": [\n    {\"term\": \"a\", \"definition\": \"b\",},\n  ],\n}";
        let cleaned = clean_json_string(raw).unwrap();
        let value: serde_json::Value = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(value["title"], "Atoms");
        assert_eq!(value["flashcards"][0]["term"], "a");
    }

    #[test]
    fn parses_deck_with_bare_keys() {
        let raw = "{title: \"Biology\", flashcards: [{term: \"Cell\", definition: \" Basic unit of life \"}]}";
        let deck = parse_generated_deck(raw).unwrap();

        assert_eq!(deck.title.as_deref(), Some("Biology"));
        assert_eq!(
            deck.flashcards,
            vec![NewCard {
                term: "Cell".to_string(),
                definition: "Basic unit of life".to_string(),
            }]
        );
    }

    #[test]
    fn valid_json_values_are_not_rewritten() {
        let raw = r#"{"flashcards":[{"term":"pH","definition":"Acidity measure, scale: 0 to 14"},{"term":"Source","definition":"See https://example.org/ph"}]}"#;
        let deck = parse_generated_deck(raw).unwrap();
        assert_eq!(deck.flashcards[0].definition, "Acidity measure, scale: 0 to 14");
        assert_eq!(deck.flashcards[1].definition, "See https://example.org/ph");

        let fenced = format!("Here you go:\n```json\n{raw}\n```");
        assert_eq!(parse_generated_deck(&fenced).unwrap(), deck);
    }

    #[test]
    fn rejects_blank_cards_and_empty_decks() {
        let blank = r#"{"flashcards": [{"term": "ok", "definition": "fine"}, {"term": " ", "definition": "x"}]}"#;
        let err = parse_generated_deck(blank).unwrap_err();
        assert!(matches!(err, FlashdeckError::Validation(msg) if msg.contains("flashcard 2")));

        assert!(parse_generated_deck(r#"{"flashcards": []}"#).is_err());
        assert!(parse_generated_deck("not a deck").is_err());
    }
}
