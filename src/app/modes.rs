//! Study mode state types.
//!
//! These enums control which face of a card is shown first and where the deck
//! is in its loading lifecycle.
//!
//! # Example
//!
//! ```rust
//! use flashdeck::app::modes::{FrontFace, LoadState};
//!
//! let front = FrontFace::Term.toggled();
//! assert_eq!(front, FrontFace::Definition);
//! assert!(LoadState::Loading.is_loading());
//! ```

/// Which side of a card is the front.
///
/// Toggled by the `T` key. Flipping a card always shows the opposite side of
/// whichever face is the front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrontFace {
    /// Show the term first, reveal the definition on flip.
    #[default]
    Term,

    /// Show the definition first, reveal the term on flip.
    Definition,
}

impl FrontFace {
    /// Returns the other face.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Term => Self::Definition,
            Self::Definition => Self::Term,
        }
    }

    /// Short label shown in the header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Term => "term first",
            Self::Definition => "definition first",
        }
    }
}

/// Lifecycle of the deck fetch issued when the session mounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// `LoadDeck` has been posted and no response has arrived yet.
    #[default]
    Loading,

    /// The deck was fetched; the session holds it.
    Ready,

    /// The fetch failed. Carries the message shown in place of the deck.
    Failed(String),
}

impl LoadState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}
