//! Gemini streaming explainer.
//!
//! Calls `models/{model}:streamGenerateContent?alt=sse` and forwards the text of
//! every server-sent event as soon as it arrives. Each event's `data:` line
//! carries one `GenerateContentResponse` JSON object; the text of its first
//! candidate is the chunk.

use crate::ai::prompt::{build_prompt, GenerationSettings, SYSTEM_INSTRUCTION};
use crate::ai::Explainer;
use crate::domain::error::{FlashdeckError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::io::{BufRead, BufReader};
use std::time::Duration;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

/// Extracts the text carried by one SSE line.
///
/// Returns `Ok(None)` for lines that carry no text: blank separators, `event:`
/// or `id:` fields, keep-alive comments, and events whose candidate is empty.
///
/// # Errors
///
/// Returns [`FlashdeckError::Explanation`] if the payload is not valid JSON or
/// reports an API error.
///
/// # Examples
///
/// ```
/// use flashdeck::ai::gemini::parse_sse_line;
///
/// let line = r#"data: {"candidates":[{"content":{"parts":[{"text":"Hello"}]}}]}"#;
/// assert_eq!(parse_sse_line(line)?, Some("Hello".to_string()));
/// assert_eq!(parse_sse_line(": keep-alive")?, None);
/// # Ok::<(), flashdeck::FlashdeckError>(())
/// ```
pub fn parse_sse_line(line: &str) -> Result<Option<String>> {
    let Some(payload) = line.trim_end().strip_prefix("data:") else {
        return Ok(None);
    };
    let payload = payload.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return Ok(None);
    }

    let chunk: StreamChunk = serde_json::from_str(payload)
        .map_err(|e| FlashdeckError::Explanation(format!("malformed stream event: {e}")))?;

    if let Some(error) = chunk.error {
        return Err(FlashdeckError::Explanation(error.message));
    }

    let text: String = chunk
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    Ok((!text.is_empty()).then_some(text))
}

/// [`Explainer`] backed by the Gemini API.
pub struct GeminiExplainer {
    client: Client,
    api_key: String,
    model: String,
    settings: GenerationSettings,
}

impl GeminiExplainer {
    /// Creates an explainer for `model` authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Config`] if the API key is empty, or
    /// [`FlashdeckError::Explanation`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, model: &str, settings: GenerationSettings) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(FlashdeckError::Config(
                "explanations require gemini_api_key (or GEMINI_API_KEY)".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FlashdeckError::Explanation(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
            settings,
        })
    }

    fn request_body(&self, term: &str, definition: &str) -> serde_json::Value {
        serde_json::json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": build_prompt(term, definition) }] }],
            "generationConfig": self.settings,
        })
    }
}

impl Explainer for GeminiExplainer {
    fn explain(&self, term: &str, definition: &str, on_chunk: &mut dyn FnMut(&str)) -> Result<()> {
        if term.trim().is_empty() || definition.trim().is_empty() {
            return Err(FlashdeckError::Validation(
                "term and definition are required".to_string(),
            ));
        }

        let _span = tracing::debug_span!("gemini_explain", model = %self.model, term = %term).entered();

        let url = format!("{API_BASE}/models/{}:streamGenerateContent", self.model);
        let response = self
            .client
            .post(url)
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(term, definition))
            .send()
            .map_err(|e| FlashdeckError::Explanation(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::debug!(status = %status, body = %body, "explanation request rejected");
            return Err(FlashdeckError::Explanation(format!("HTTP {status}")));
        }

        let mut chunks = 0usize;
        for line in BufReader::new(response).lines() {
            let line = line.map_err(|e| FlashdeckError::Explanation(format!("stream interrupted: {e}")))?;
            if let Some(text) = parse_sse_line(&line)? {
                chunks += 1;
                on_chunk(&text);
            }
        }

        tracing::debug!(chunks = chunks, "explanation stream complete");
        Ok(())
    }
}
