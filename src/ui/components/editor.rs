//! Edit form renderer.

use super::FRAME_MARGIN;
use crate::ui::helpers::{clip, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EditorView;

/// Renders the term and definition fields of the card being edited. Returns
/// the next free row.
pub fn render_editor(out: &mut String, row: usize, editor: &EditorView, theme: &Theme, cols: usize) -> usize {
    let value_width = cols.saturating_sub(2 * FRAME_MARGIN + 12);

    for (offset, (label, value)) in [("Term", &editor.term), ("Definition", &editor.definition)]
        .into_iter()
        .enumerate()
    {
        position_cursor(out, row + offset, FRAME_MARGIN + 1);
        out.push_str(&Theme::fg(&theme.colors.text_dim));
        out.push_str(&format!("{label:<11} "));
        out.push_str(Theme::reset());
        out.push_str(&Theme::fg(&theme.colors.text_normal));
        if value.trim().is_empty() {
            out.push_str(Theme::dim());
            out.push_str("(empty)");
        } else {
            out.push_str(&clip(value, value_width));
        }
        out.push_str(Theme::reset());
    }

    row + 2
}
