//! Footer component renderer.

use crate::ui::helpers::{clip, position_cursor, push_centered, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the footer at `row` and returns the next free row.
///
/// An open prompt takes the left side with a block cursor and the hints move
/// to the right; otherwise the hints are centered and dimmed.
pub fn render_footer(out: &mut String, row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);

    let Some(prompt) = &footer.prompt else {
        out.push_str(&Theme::fg(&theme.colors.text_dim));
        push_centered(out, &footer.keybindings, cols);
        out.push_str(Theme::reset());
        return row + 1;
    };

    let prompt = clip(prompt, cols.saturating_sub(2));
    out.push_str(&Theme::fg(&theme.colors.text_normal));
    out.push_str(&prompt);
    out.push('█');

    let used = width(&prompt) + 1;
    let hint_width = width(&footer.keybindings);
    if used + 2 + hint_width <= cols {
        out.push_str(&" ".repeat(cols - used - hint_width));
        out.push_str(&Theme::fg(&theme.colors.text_dim));
        out.push_str(&footer.keybindings);
    }
    out.push_str(Theme::reset());
    row + 1
}
