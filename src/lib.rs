//! flashdeck: a terminal flashcard study tool.
//!
//! flashdeck provides:
//! - A study session over one deck: flip, navigate, shuffle, star, filter to
//!   starred cards, full screen
//! - Optimistic star toggles and card edits that roll back if the backing
//!   store rejects them
//! - Streamed AI explanations of the current card (Gemini)
//! - Deck storage in a local JSON file or a hosted Supabase database
//! - Import of model-generated decks, with repair of malformed JSON
//!
//! # Architecture
//!
//! ```text
//!  main.rs ── Event ──► app::handle_event ──► StudySession ──► ui::render
//!                              │
//!                              │ Action::PostToWorker
//!                              ▼
//!                        worker thread ── DeckGateway ──► storage::{json, supabase}
//!                              │
//!                              └──── Explainer ──► ai::gemini (one thread per request)
//! ```
//!
//! The session never blocks on I/O. Mutations are applied locally first and
//! settled by the worker's reply: a failure restores the snapshot taken
//! before the mutation. `domain` holds the shared card types and errors,
//! `infrastructure` the platform paths, and `observability` the log file
//! sink.
//!
//! # Configuration
//!
//! Read from `<config_dir>/flashdeck/config.toml` (or `--config`), then
//! environment variables, then `--set key=value` pairs:
//!
//! ```toml
//! backend = "json"
//! store_path = "~/decks.json"
//! gemini_model = "gemini-2.5-flash-lite"
//! theme = "catppuccin-latte"
//! page_size = 10
//! ```
//!
//! # Example
//!
//! ```rust
//! use flashdeck::{initialize, handle_event, Action, Config, Event};
//! use flashdeck::worker::WorkerResponse;
//! use flashdeck::Flashcard;
//!
//! let (mut session, actions) = initialize(&Config::default(), "deck-1");
//! assert!(matches!(actions.as_slice(), [Action::PostToWorker(_)]));
//!
//! let loaded = Event::WorkerResponse(WorkerResponse::DeckLoaded {
//!     deck_id: "deck-1".into(),
//!     cards: vec![Flashcard::new("a", "Atom", "Smallest unit of matter", "deck-1")],
//! });
//! handle_event(&mut session, &loaded)?;
//! assert_eq!(session.active_len(), 1);
//! # Ok::<(), flashdeck::FlashdeckError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod ai;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, Event, FrontFace, StudySession};
pub use domain::{Flashcard, FlashdeckError, Result};
pub use ui::Theme;

use ai::{Explainer, GeminiExplainer, GenerationSettings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use storage::{DeckGateway, JsonDeckStore, SupabaseGateway};

/// Where decks are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Local JSON file.
    #[default]
    Json,
    /// Hosted Supabase (PostgREST) database.
    Supabase,
}

/// Runtime configuration.
///
/// Every field has a default, so an empty or missing file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,

    /// JSON store location. Default: `<data_dir>/flashdeck/decks.json`.
    pub store_path: Option<String>,

    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,

    /// Enables explanations when set.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme: Option<String>,

    /// Path to a custom TOML theme file. See [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Term list rows per page.
    pub page_size: usize,

    pub toast_ttl_secs: u64,

    /// Frame size used when the terminal size is unknown.
    pub rows: usize,
    pub cols: usize,
}

const DEFAULT_PAGE_SIZE: usize = app::term_list::DEFAULT_PAGE_SIZE;
const DEFAULT_TOAST_TTL_SECS: u64 = 4;
const DEFAULT_ROWS: usize = 30;
const DEFAULT_COLS: usize = 100;

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Json,
            store_path: None,
            supabase_url: None,
            supabase_key: None,
            gemini_api_key: None,
            gemini_model: ai::prompt::DEFAULT_MODEL.to_string(),
            theme: None,
            theme_file: None,
            trace_level: None,
            page_size: DEFAULT_PAGE_SIZE,
            toast_ttl_secs: DEFAULT_TOAST_TTL_SECS,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

/// Treats blank strings as unset.
fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// With `path` set, the file must exist. Without it, the default location
    /// is tried and a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this structure.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let default_path = infrastructure::get_config_path();
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (default_path.as_path(), false),
        };

        if !required && !path.exists() {
            tracing::debug!(path = ?path, "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| FlashdeckError::Config(format!("invalid config {}: {e}", path.display())))?;
        tracing::debug!(path = ?path, backend = ?config.backend, "config loaded");
        Ok(config)
    }

    /// Applies `GEMINI_API_KEY`, `SUPABASE_URL` and `SUPABASE_KEY` from the
    /// process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).as_deref().and_then(non_empty);
        if let Some(key) = get("GEMINI_API_KEY") {
            self.gemini_api_key = Some(key);
        }
        if let Some(url) = get("SUPABASE_URL") {
            self.supabase_url = Some(url);
        }
        if let Some(key) = get("SUPABASE_KEY") {
            self.supabase_key = Some(key);
        }
    }

    /// Applies `key=value` overrides.
    ///
    /// # Parsing Rules
    ///
    /// - numbers: parsed, falling back to the default on parse errors
    /// - `backend`: `json` or `supabase`; anything else is ignored
    /// - strings: blank values unset the option
    /// - unknown keys are logged and ignored
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use flashdeck::{Backend, Config};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("backend".to_string(), "supabase".to_string());
    /// map.insert("page_size".to_string(), "many".to_string());
    ///
    /// let mut config = Config::default();
    /// config.apply_overrides(&map);
    /// assert_eq!(config.backend, Backend::Supabase);
    /// assert_eq!(config.page_size, 10);
    /// ```
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, String>) {
        for (key, value) in overrides {
            match key.as_str() {
                "backend" => match value.trim().to_ascii_lowercase().as_str() {
                    "json" => self.backend = Backend::Json,
                    "supabase" => self.backend = Backend::Supabase,
                    other => tracing::warn!(backend = %other, "unknown backend ignored"),
                },
                "store_path" => self.store_path = non_empty(value),
                "supabase_url" => self.supabase_url = non_empty(value),
                "supabase_key" => self.supabase_key = non_empty(value),
                "gemini_api_key" => self.gemini_api_key = non_empty(value),
                "gemini_model" => {
                    self.gemini_model = non_empty(value).unwrap_or_else(|| ai::prompt::DEFAULT_MODEL.to_string());
                }
                "theme" => self.theme = non_empty(value),
                "theme_file" => self.theme_file = non_empty(value),
                "trace_level" => self.trace_level = non_empty(value),
                "page_size" => self.page_size = value.trim().parse().unwrap_or(DEFAULT_PAGE_SIZE),
                "toast_ttl_secs" => self.toast_ttl_secs = value.trim().parse().unwrap_or(DEFAULT_TOAST_TTL_SECS),
                "rows" => self.rows = value.trim().parse().unwrap_or(DEFAULT_ROWS),
                "cols" => self.cols = value.trim().parse().unwrap_or(DEFAULT_COLS),
                unknown => tracing::warn!(key = %unknown, "unknown config key ignored"),
            }
        }
    }

    /// Resolves the theme: `theme_file`, then `theme`, then the default. A
    /// theme that fails to load falls back to the default.
    #[must_use]
    pub fn theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            return Theme::from_file(infrastructure::expand_tilde(theme_file)).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            });
        }

        self.theme.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                Theme::default()
            })
        })
    }

    /// Opens the configured deck store.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON store cannot be opened, or the Supabase
    /// backend is selected without both URL and key.
    pub fn build_gateway(&self) -> Result<Box<dyn DeckGateway>> {
        match self.backend {
            Backend::Json => {
                let path = self
                    .store_path
                    .as_deref()
                    .map_or_else(infrastructure::default_store_path, infrastructure::expand_tilde);
                Ok(Box::new(JsonDeckStore::new(path)?))
            }
            Backend::Supabase => {
                let (Some(url), Some(key)) = (&self.supabase_url, &self.supabase_key) else {
                    return Err(FlashdeckError::Config(
                        "supabase backend requires supabase_url and supabase_key".to_string(),
                    ));
                };
                Ok(Box::new(SupabaseGateway::new(url, key)?))
            }
        }
    }

    /// Builds the explanation client, or `None` when no API key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn build_explainer(&self) -> Result<Option<Arc<dyn Explainer>>> {
        let Some(api_key) = &self.gemini_api_key else {
            tracing::debug!("no Gemini API key, explanations disabled");
            return Ok(None);
        };

        let explainer = GeminiExplainer::new(api_key, &self.gemini_model, GenerationSettings::default())?;
        Ok(Some(Arc::new(explainer)))
    }
}

/// Creates a study session for `deck_id` and the action that fetches its cards.
///
/// # Example
///
/// ```rust
/// use flashdeck::{initialize, Action, Config};
/// use flashdeck::worker::WorkerMessage;
///
/// let (session, actions) = initialize(&Config::default(), "deck-1");
/// assert!(session.load_state().is_loading());
/// assert_eq!(actions, vec![Action::PostToWorker(WorkerMessage::load_deck("deck-1"))]);
/// ```
#[must_use]
pub fn initialize(config: &Config, deck_id: &str) -> (StudySession, Vec<Action>) {
    tracing::debug!(deck_id = %deck_id, "initializing study session");

    let session = StudySession::new(deck_id, config.theme())
        .with_page_size(config.page_size)
        .with_toast_ttl(config.toast_ttl_secs);

    (
        session,
        vec![Action::PostToWorker(worker::WorkerMessage::load_deck(deck_id))],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend = \"supabase\"\npage_size = 5\ntheme = \"catppuccin-latte\"\n").unwrap();

        let mut config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.backend, Backend::Supabase);
        assert_eq!(config.page_size, 5);
        assert_eq!(config.toast_ttl_secs, DEFAULT_TOAST_TTL_SECS);
        assert_eq!(config.theme().name, "catppuccin-latte");

        let overrides = BTreeMap::from([
            ("backend".to_string(), "json".to_string()),
            ("theme".to_string(), " ".to_string()),
            ("rows".to_string(), "40".to_string()),
        ]);
        config.apply_overrides(&overrides);
        assert_eq!(config.backend, Backend::Json);
        assert_eq!(config.theme, None);
        assert_eq!(config.rows, 40);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(dir.path().join("absent.toml").as_path())).is_err());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "page_size = \"ten\"").unwrap();
        assert!(matches!(Config::load(Some(bad.as_path())), Err(FlashdeckError::Config(_))));
    }

    #[test]
    fn environment_fills_credentials() {
        let mut config = Config::default();
        config.apply_env_from(|key| match key {
            "GEMINI_API_KEY" => Some("g-key".to_string()),
            "SUPABASE_URL" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.gemini_api_key.as_deref(), Some("g-key"));
        assert_eq!(config.supabase_url, None);
    }

    #[test]
    fn supabase_without_credentials_is_rejected() {
        let config = Config {
            backend: Backend::Supabase,
            ..Config::default()
        };
        assert!(matches!(config.build_gateway(), Err(FlashdeckError::Config(_))));
        assert!(config.build_explainer().unwrap().is_none());
    }

    #[test]
    fn json_gateway_uses_store_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            store_path: Some(dir.path().join("decks.json").to_string_lossy().into_owned()),
            ..Config::default()
        };
        let gateway = config.build_gateway().unwrap();
        assert!(gateway.list_decks().unwrap().is_empty());
    }
}
