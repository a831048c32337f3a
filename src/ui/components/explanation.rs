//! Explanation panel renderer.
//!
//! The panel replaces the term list while open. It shows a loading line until
//! the first chunk arrives, then the streamed text, or the failure message in
//! the error color.

use super::{render_frame_bottom, render_frame_top, FRAME_MARGIN};
use crate::ui::helpers::{position_cursor, wrap};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ExplanationView;

/// Renders the panel from `row` down to at most `last_row` (inclusive) and
/// returns the next free row. Keeps the newest lines when the text is taller
/// than the space available.
pub fn render_explanation(
    out: &mut String,
    row: usize,
    explanation: &ExplanationView,
    theme: &Theme,
    cols: usize,
    last_row: usize,
) -> usize {
    let inner = cols.saturating_sub(2 * FRAME_MARGIN + 4);
    let title = format!("Explain · {}", explanation.term);
    render_frame_top(out, row, &title, None, &theme.colors.card_border, cols);

    let (lines, color) = if explanation.is_loading {
        (vec!["Generating explanation…".to_string()], &theme.colors.text_dim)
    } else if explanation.is_error {
        (wrap(&explanation.body, inner), &theme.colors.error_fg)
    } else {
        (wrap(&explanation.body, inner), &theme.colors.text_normal)
    };

    let available = last_row.saturating_sub(row + 1).max(1);
    let start = lines.len().saturating_sub(available);
    let mut current = row + 1;
    for line in &lines[start..] {
        position_cursor(out, current, FRAME_MARGIN + 3);
        out.push_str(&Theme::fg(color));
        out.push_str(line);
        out.push_str(Theme::reset());
        current += 1;
    }

    let hint = if explanation.is_loading { "loading" } else { "esc to close" };
    render_frame_bottom(out, current, hint, &theme.colors.card_border, cols)
}
