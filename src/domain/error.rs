//! Error types for flashdeck.
//!
//! This module defines the centralized error type [`FlashdeckError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented with the
//! `thiserror` crate.
//!
//! Errors raised by deck persistence or explanation streaming never escape the
//! study session: the worker converts them into failure responses and the session
//! turns those into rollbacks and notifications. The variants here surface on the
//! CLI paths (`decks`, `import`, `explain`) and at startup.

use thiserror::Error;

/// The main error type for flashdeck operations.
///
/// # Examples
///
/// ```
/// use flashdeck::FlashdeckError;
///
/// fn validate_card(term: &str) -> Result<(), FlashdeckError> {
///     if term.trim().is_empty() {
///         return Err(FlashdeckError::Validation("term must not be empty".to_string()));
///     }
///     Ok(())
/// }
/// assert!(validate_card("").is_err());
/// ```
#[derive(Debug, Error)]
pub enum FlashdeckError {
    /// Local storage operation failed.
    ///
    /// Occurs when the JSON deck store cannot be parsed, serialized, or when a
    /// referenced deck or card does not exist.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote deck gateway request failed.
    ///
    /// Covers transport errors and non-success HTTP statuses from the hosted
    /// database.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// AI explanation request or stream failed.
    #[error("Explanation error: {0}")]
    Explanation(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// User-supplied data failed validation (empty term, malformed deck file).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A JSON repair pattern failed to compile.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A specialized `Result` type for flashdeck operations.
pub type Result<T> = std::result::Result<T, FlashdeckError>;
