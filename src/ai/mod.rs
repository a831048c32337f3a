//! AI integration: streamed card explanations and repair of model-generated decks.
//!
//! # Modules
//!
//! - [`gemini`]: Streaming client for the Gemini `streamGenerateContent` endpoint
//! - [`prompt`]: Explanation prompt text and generation settings
//! - [`repair`]: Cleanup of malformed JSON emitted by language models

pub mod gemini;
pub mod prompt;
pub mod repair;

pub use gemini::GeminiExplainer;
pub use prompt::GenerationSettings;
pub use repair::{clean_json_string, parse_generated_deck, GeneratedDeck};

use crate::domain::error::Result;

/// Source of streamed plain-text explanations for a card.
///
/// Implementations deliver the explanation incrementally through `on_chunk`, in
/// order, and return once the stream is complete. An `Err` after some chunks
/// were delivered means the stream broke off; callers must treat what they
/// received so far as unusable.
///
/// # Examples
///
/// ```
/// use flashdeck::ai::Explainer;
///
/// struct Echo;
///
/// impl Explainer for Echo {
///     fn explain(&self, term: &str, definition: &str, on_chunk: &mut dyn FnMut(&str)) -> flashdeck::Result<()> {
///         on_chunk(term);
///         on_chunk(": ");
///         on_chunk(definition);
///         Ok(())
///     }
/// }
///
/// let mut text = String::new();
/// Echo.explain("Atom", "smallest unit", &mut |chunk| text.push_str(chunk))?;
/// assert_eq!(text, "Atom: smallest unit");
/// # Ok::<(), flashdeck::FlashdeckError>(())
/// ```
pub trait Explainer: Send + Sync {
    /// Streams an explanation of `term` / `definition`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Validation`](crate::FlashdeckError::Validation)
    /// when either input is blank, and
    /// [`FlashdeckError::Explanation`](crate::FlashdeckError::Explanation) when
    /// the request or the stream fails.
    fn explain(&self, term: &str, definition: &str, on_chunk: &mut dyn FnMut(&str)) -> Result<()>;
}
