//! Empty state component renderer.
//!
//! Shown in place of the card while the deck is loading, when loading failed,
//! when the deck has no cards, and when the starred-only view is empty.

use crate::ui::helpers::{position_cursor, push_centered};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders a centered two-line message starting at `row`.
///
/// # Layout
///
/// ```text
/// [left padding] MESSAGE [right padding]
/// [left padding] subtitle [right padding]
/// ```
///
/// The message uses `empty_state_fg`; the subtitle is dimmed. An empty
/// subtitle still occupies its line. Returns the next free row.
pub fn render_empty_state(out: &mut String, row: usize, empty: &EmptyState, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(&theme.colors.empty_state_fg));
    push_centered(out, &empty.message, cols);
    out.push_str(Theme::reset());

    position_cursor(out, row + 1, 1);
    out.push_str(Theme::dim());
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    push_centered(out, &empty.subtitle, cols);
    out.push_str(Theme::reset());

    row + 2
}
