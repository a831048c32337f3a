//! `flashdeck` command line entry point.
//!
//! # Architecture
//!
//! `study` runs a single-threaded session loop fed by one channel:
//!
//! ```text
//! ┌──────────────┐   Event::Key / Event::Resize
//! │ input thread │ ─────────────────────────────┐
//! └──────────────┘                              ▼
//!                                   ┌──────────────────────┐
//!                                   │  session loop        │ ── render ─► stdout
//!                                   │  handle_event        │
//!                                   └──────────────────────┘
//! ┌──────────────┐   Event::WorkerResponse      ▲      │ Action::PostToWorker
//! │ worker thread│ ─────────────────────────────┘      ▼
//! └──────────────┘ ◄──────────────────────────── WorkerHandle
//! ```
//!
//! The input thread reads raw-mode key presses with `crossterm`. A receive
//! timeout produces `Event::Tick`, which expires toasts.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `flashdeck decks` | List decks in the configured store |
//! | `flashdeck study <deck-id>` | Study a deck |
//! | `flashdeck import <title> <file>` | Import a (possibly malformed) JSON deck |
//! | `flashdeck delete <deck-id>` | Delete a deck and its cards |
//! | `flashdeck explain <term> <definition>` | Stream one explanation to stdout |

#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::terminal::{Clear, ClearType};
use flashdeck::ai::parse_generated_deck;
use flashdeck::app::input::translate;
use flashdeck::infrastructure::{size_or, TerminalGuard};
use flashdeck::worker::{DeckWorker, WorkerHandle};
use flashdeck::{handle_event, initialize, Action, Config, Event, FlashdeckError, Result};

/// How often the session loop wakes up without input to expire toasts.
const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Terminal flashcard study tool.
#[derive(Parser)]
#[command(name = "flashdeck", version, about)]
struct Cli {
    /// Path to configuration file (TOML). Defaults to
    /// `<config_dir>/flashdeck/config.toml` if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override a configuration value, e.g. `--set backend=supabase`.
    #[arg(long = "set", global = true, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    overrides: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List decks, newest first.
    Decks,

    /// Study a deck interactively.
    ///
    /// Keys: Enter/space flip, left/right navigate, s star, r shuffle,
    /// t front face, q starred only, f full screen, e explain, Esc close.
    /// `/` searches the term list. `:` runs a command: edit, term=...,
    /// definition=..., w, q, all, ], [, quit. Ctrl-C leaves.
    Study {
        /// Deck id as printed by `flashdeck decks`.
        deck_id: String,
    },

    /// Import a deck from a JSON file, repairing common model output defects.
    Import {
        /// Title of the new deck.
        title: String,
        /// File with `{"flashcards": [{"term": ..., "definition": ...}]}`.
        file: PathBuf,
    },

    /// Delete a deck together with its cards.
    Delete {
        /// Deck id as printed by `flashdeck decks`.
        deck_id: String,
    },

    /// Stream an explanation of one term to stdout.
    Explain { term: String, definition: String },
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env();
    let overrides: BTreeMap<String, String> = cli.overrides.iter().cloned().collect();
    config.apply_overrides(&overrides);
    Ok(config)
}

fn list_decks(config: &Config) -> Result<()> {
    let gateway = config.build_gateway()?;
    let decks = gateway.list_decks()?;
    if decks.is_empty() {
        println!("No decks yet. Import one with `flashdeck import <title> <file>`.");
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    for deck in decks {
        let created = chrono::DateTime::from_timestamp(deck.created_at, 0)
            .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d").to_string());
        writeln!(stdout, "{}  {:<32}  {:>4} cards  {created}", deck.id, deck.title, deck.card_count)?;
    }
    Ok(())
}

fn import_deck(config: &Config, title: &str, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)?;
    let deck = parse_generated_deck(&raw)?;

    let title = title.trim();
    if title.is_empty() {
        return Err(FlashdeckError::Validation("deck title cannot be empty".to_string()));
    }

    let mut gateway = config.build_gateway()?;
    let summary = gateway.save_deck(title, &deck.flashcards)?;
    println!("Imported {} cards into \"{}\" ({})", summary.card_count, summary.title, summary.id);
    Ok(())
}

fn delete_deck(config: &Config, deck_id: &str) -> Result<()> {
    let mut gateway = config.build_gateway()?;
    gateway.delete_deck(deck_id)?;
    tracing::info!(deck_id = %deck_id, "deck deleted");
    println!("Deleted deck {deck_id}");
    Ok(())
}

fn explain(config: &Config, term: &str, definition: &str) -> Result<()> {
    let explainer = config
        .build_explainer()?
        .ok_or_else(|| FlashdeckError::Config("set GEMINI_API_KEY or gemini_api_key to use explanations".to_string()))?;

    let mut stdout = std::io::stdout().lock();
    explainer.explain(term, definition, &mut |chunk| {
        let _ = write!(stdout, "{chunk}");
        let _ = stdout.flush();
    })?;
    writeln!(stdout)?;
    Ok(())
}

fn draw(session: &flashdeck::StudySession, rows: usize, cols: usize) -> Result<()> {
    let frame = flashdeck::ui::render(session, rows, cols);
    let mut stdout = std::io::stdout().lock();
    crossterm::queue!(stdout, Clear(ClearType::All))?;
    stdout.write_all(frame.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn study(config: &Config, deck_id: &str) -> Result<()> {
    let _span = tracing::debug_span!("study", deck_id = %deck_id).entered();

    let (events, inbox) = mpsc::channel::<Event>();

    let worker = DeckWorker::new(config.build_gateway()?, config.build_explainer()?);
    let worker_events = events.clone();
    let handle = WorkerHandle::spawn(worker, move |response| {
        let _ = worker_events.send(Event::WorkerResponse(response));
    })?;

    let _terminal = TerminalGuard::enter()?;
    let (mut rows, mut cols) = size_or(config.rows, config.cols);

    std::thread::Builder::new()
        .name("flashdeck-input".to_string())
        .spawn(move || loop {
            match crossterm::event::read() {
                Ok(raw) => {
                    let Some(event) = translate(&raw) else { continue };
                    if events.send(event).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "terminal input failed");
                    let _ = events.send(Event::Exit);
                    return;
                }
            }
        })?;

    let (mut session, actions) = initialize(config, deck_id);
    for action in actions {
        if let Action::PostToWorker(message) = action {
            handle.post(message)?;
        }
    }
    draw(&session, rows, cols)?;

    loop {
        let event = match inbox.recv_timeout(TICK_INTERVAL) {
            Ok(event) => event,
            Err(mpsc::RecvTimeoutError::Timeout) => Event::Tick,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };
        if let Event::Resize { rows: new_rows, cols: new_cols } = event {
            (rows, cols) = (new_rows, new_cols);
        }

        let (should_render, actions) = handle_event(&mut session, &event)?;

        let mut exit = false;
        for action in actions {
            match action {
                Action::PostToWorker(message) => handle.post(message)?,
                Action::Exit => exit = true,
            }
        }
        if exit {
            break;
        }
        if should_render {
            draw(&session, rows, cols)?;
        }
    }

    tracing::debug!("study session ended");
    drop(handle);
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    flashdeck::observability::init_tracing(&config);
    tracing::debug!(backend = ?config.backend, "flashdeck starting");

    match &cli.command {
        Commands::Decks => list_decks(&config),
        Commands::Study { deck_id } => study(&config, deck_id),
        Commands::Import { title, file } => import_deck(&config, title, file),
        Commands::Delete { deck_id } => delete_deck(&config, deck_id),
        Commands::Explain { term, definition } => explain(&config, term, definition),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
