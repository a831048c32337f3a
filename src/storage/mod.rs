//! Storage layer for flashcard decks.
//!
//! This module provides the deck gateway abstraction and its two backends: a
//! local JSON file and a hosted Supabase database. The gateway is owned by the
//! deck worker; the study session only sees the outcome of each call.
//!
//! # Modules
//!
//! - `backend`: Gateway trait abstraction for backend implementations
//! - `json`: JSON file-based deck store
//! - `supabase`: PostgREST client for the hosted database
//! - `models`: Storage record types separate from domain models

pub mod backend;
pub mod json;
pub mod models;
pub mod supabase;

pub use backend::DeckGateway;
pub use json::JsonDeckStore;
pub use models::{DeckRecord, FlashcardRecord};
pub use supabase::SupabaseGateway;
