//! Worker thread message types for cross-thread communication.
//!
//! This module defines the request and response protocol between the session
//! loop and the background worker that performs deck persistence and
//! explanation streaming. Every persisted mutation carries the [`MutationId`]
//! under which the session parked its rollback snapshot, and every explanation
//! carries the [`RequestId`] that lets the session drop stale chunks.

use crate::app::explain::RequestId;
use crate::app::pending::MutationId;
use crate::domain::Flashcard;
use serde::{Deserialize, Serialize};

/// Macro to generate builder methods for `WorkerMessage` variants.
///
/// Generates convenience constructors taking anything convertible into the
/// owned field types.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message")]
                #[must_use]
                pub fn $builder_name($($field: impl Into<$ty>),*) -> Self {
                    Self::$variant {
                        $($field: $field.into(),)*
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_deck(LoadDeck { deck_id: String }),
    update_star(UpdateStar { mutation: MutationId, card_id: String, is_starred: bool }),
    update_all_stars(UpdateAllStars { mutation: MutationId, deck_id: String, is_starred: bool }),
    update_content(UpdateContent { mutation: MutationId, card_id: String, term: String, definition: String }),
    explain(Explain { request: RequestId, term: String, definition: String }),
}

/// Messages sent from the session loop to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Fetch all cards of a deck in stored order.
    LoadDeck {
        deck_id: String,
    },

    /// Persist the star flag of one card.
    UpdateStar {
        /// Mutation whose snapshot is restored if the write fails.
        mutation: MutationId,
        card_id: String,
        is_starred: bool,
    },

    /// Persist one star value for every card of a deck in a single call.
    UpdateAllStars {
        mutation: MutationId,
        deck_id: String,
        is_starred: bool,
    },

    /// Persist edited card content.
    UpdateContent {
        mutation: MutationId,
        card_id: String,
        term: String,
        definition: String,
    },

    /// Stream an explanation of a card.
    Explain {
        request: RequestId,
        term: String,
        definition: String,
    },

    /// Stop the worker loop.
    Shutdown,
}

impl WorkerMessage {
    /// Short operation name used in logs and failure messages.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::LoadDeck { .. } => "load deck",
            Self::UpdateStar { .. } => "update star status",
            Self::UpdateAllStars { .. } => "update all stars",
            Self::UpdateContent { .. } => "update flashcard content",
            Self::Explain { .. } => "explain concept",
            Self::Shutdown => "shutdown",
        }
    }
}

/// Responses sent from the worker thread back to the session loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// Cards of a deck were fetched.
    DeckLoaded {
        deck_id: String,
        cards: Vec<Flashcard>,
    },

    /// Fetching a deck failed.
    DeckLoadFailed {
        deck_id: String,
        message: String,
    },

    /// The backing store confirmed a mutation.
    MutationCommitted {
        mutation: MutationId,
    },

    /// The backing store rejected a mutation; its snapshot must be restored.
    MutationFailed {
        mutation: MutationId,
        message: String,
    },

    /// One increment of explanation text.
    ExplanationChunk {
        request: RequestId,
        text: String,
    },

    /// The explanation stream ended normally.
    ExplanationFinished {
        request: RequestId,
    },

    /// The explanation request or stream failed.
    ExplanationFailed {
        request: RequestId,
        message: String,
    },
}
