//! Keyboard command routing.
//!
//! Single key presses map to study commands through the static [`BINDINGS`]
//! table. The router holds no state: whether a key fires depends only on the
//! key and the [`FocusContext`] passed in.
//!
//! # Guards
//!
//! - While a text input has focus (editing a card), no shortcut fires.
//! - While the explanation panel is open, only `Escape` and `Enter` fire, and
//!   both close the panel.
//! - `Escape` exits full screen only when full screen is on.
//!
//! # Example
//!
//! ```rust
//! use flashdeck::app::keymap::{route, Command, FocusContext, Key};
//!
//! let ctx = FocusContext::default();
//! assert_eq!(route(Key::Char('S'), &ctx), Some(Command::ToggleStar));
//! assert_eq!(route(Key::Right, &ctx), Some(Command::Next));
//!
//! let editing = FocusContext { text_input_focused: true, ..ctx };
//! assert_eq!(route(Key::Char('s'), &editing), None);
//! ```

/// A key press, independent of how the terminal reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Space,
    Enter,
    Left,
    Right,
    Esc,
    /// Only meaningful to an open prompt; no binding uses it.
    Backspace,
}

impl Key {
    /// Folds letters to lowercase so bindings match regardless of case.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Char(c) => Self::Char(c.to_ascii_lowercase()),
            other => other,
        }
    }
}

/// Study commands a key can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Flip,
    Next,
    Prev,
    /// Toggle the star of the current card.
    ToggleStar,
    Shuffle,
    ToggleMode,
    ToggleStarredOnly,
    ToggleFullScreen,
    Explain,
    ExitFullScreen,
    CloseExplanation,
}

/// Focus and modal state the guard predicate needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusContext {
    /// A free-text input (the card edit form) has focus.
    pub text_input_focused: bool,
    /// The explanation panel is open.
    pub modal_open: bool,
    pub full_screen: bool,
}

/// Key to command table. Letter keys are listed lowercase.
pub const BINDINGS: &[(Key, Command)] = &[
    (Key::Space, Command::Flip),
    (Key::Enter, Command::Flip),
    (Key::Right, Command::Next),
    (Key::Left, Command::Prev),
    (Key::Char('s'), Command::ToggleStar),
    (Key::Char('r'), Command::Shuffle),
    (Key::Char('t'), Command::ToggleMode),
    (Key::Char('q'), Command::ToggleStarredOnly),
    (Key::Char('f'), Command::ToggleFullScreen),
    (Key::Char('e'), Command::Explain),
    (Key::Esc, Command::ExitFullScreen),
];

/// Returns `true` when keyboard shortcuts may fire at all.
#[must_use]
pub const fn shortcuts_enabled(ctx: &FocusContext) -> bool {
    !ctx.text_input_focused
}

/// Looks up the command bound to `key`, ignoring guards.
#[must_use]
pub fn lookup(key: Key) -> Option<Command> {
    let key = key.normalized();
    BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, command)| *command)
}

/// Maps a key press to a command, applying the focus and modal guards.
#[must_use]
pub fn route(key: Key, ctx: &FocusContext) -> Option<Command> {
    if !shortcuts_enabled(ctx) {
        return None;
    }

    if ctx.modal_open {
        return matches!(key, Key::Esc | Key::Enter).then_some(Command::CloseExplanation);
    }

    match lookup(key)? {
        Command::ExitFullScreen if !ctx.full_screen => None,
        command => Some(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_study_key() {
        let ctx = FocusContext::default();
        let expected = [
            (Key::Space, Command::Flip),
            (Key::Enter, Command::Flip),
            (Key::Right, Command::Next),
            (Key::Left, Command::Prev),
            (Key::Char('s'), Command::ToggleStar),
            (Key::Char('R'), Command::Shuffle),
            (Key::Char('t'), Command::ToggleMode),
            (Key::Char('Q'), Command::ToggleStarredOnly),
            (Key::Char('f'), Command::ToggleFullScreen),
            (Key::Char('E'), Command::Explain),
        ];
        for (key, command) in expected {
            assert_eq!(route(key, &ctx), Some(command), "{key:?}");
        }
        assert_eq!(route(Key::Char('x'), &ctx), None);
    }

    #[test]
    fn escape_only_exits_an_active_full_screen() {
        let windowed = FocusContext::default();
        assert_eq!(route(Key::Esc, &windowed), None);

        let full = FocusContext {
            full_screen: true,
            ..windowed
        };
        assert_eq!(route(Key::Esc, &full), Some(Command::ExitFullScreen));
    }

    #[test]
    fn text_focus_suppresses_everything() {
        let ctx = FocusContext {
            text_input_focused: true,
            modal_open: true,
            full_screen: true,
        };
        assert!(!shortcuts_enabled(&ctx));
        for (key, _) in BINDINGS {
            assert_eq!(route(*key, &ctx), None);
        }
    }

    #[test]
    fn open_panel_only_accepts_close_keys() {
        let ctx = FocusContext {
            modal_open: true,
            ..FocusContext::default()
        };
        assert_eq!(route(Key::Esc, &ctx), Some(Command::CloseExplanation));
        assert_eq!(route(Key::Enter, &ctx), Some(Command::CloseExplanation));
        assert_eq!(route(Key::Right, &ctx), None);
        assert_eq!(route(Key::Char('s'), &ctx), None);
    }

    #[test]
    fn backspace_is_unbound() {
        assert_eq!(lookup(Key::Backspace), None);
        assert_eq!(route(Key::Backspace, &FocusContext::default()), None);
    }
}
