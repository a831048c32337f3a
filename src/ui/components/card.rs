//! Card component renderer.
//!
//! Draws the current card as a framed panel: the face label and star marker in
//! the top edge, the visible face's text wrapped and centered inside.

use super::{render_frame_bottom, render_frame_top, FRAME_MARGIN};
use crate::ui::helpers::{position_cursor, push_centered, wrap};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::CardView;

/// Smallest card that still has one line of text.
pub const MIN_CARD_HEIGHT: usize = 3;

/// Renders the card in `height` rows starting at `row` and returns the next
/// free row. Text that does not fit is cut at the bottom edge.
pub fn render_card(out: &mut String, row: usize, card: &CardView, theme: &Theme, cols: usize, height: usize) -> usize {
    let height = height.max(MIN_CARD_HEIGHT);
    let inner = cols.saturating_sub(2 * FRAME_MARGIN + 4);
    let star = if card.is_starred { "★" } else { "☆" };

    render_frame_top(out, row, card.face_label, Some((star, &theme.colors.star_fg)), &theme.colors.card_border, cols);

    let body_rows = height - 2;
    let lines = wrap(&card.text, inner);
    let top_pad = body_rows.saturating_sub(lines.len()) / 2;

    for offset in 0..body_rows {
        let line = offset
            .checked_sub(top_pad)
            .and_then(|i| lines.get(i))
            .map_or("", String::as_str);

        position_cursor(out, row + 1 + offset, FRAME_MARGIN + 1);
        out.push_str(&Theme::fg(&theme.colors.card_border));
        out.push_str("│ ");
        out.push_str(Theme::reset());
        out.push_str(Theme::bold());
        out.push_str(&Theme::fg(&theme.colors.text_normal));
        push_centered(out, line, inner);
        out.push_str(Theme::reset());
        out.push_str(&Theme::fg(&theme.colors.card_border));
        out.push_str(" │");
        out.push_str(Theme::reset());
    }

    let hint = if card.is_flipped { "flipped" } else { "space to flip" };
    render_frame_bottom(out, row + height - 1, hint, &theme.colors.card_border, cols)
}
