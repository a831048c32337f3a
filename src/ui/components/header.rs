//! Header component renderer.
//!
//! Renders the deck title on the left and the position plus status badges on
//! the right of a single bold line.

use crate::ui::helpers::{clip, position_cursor, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the header line at `row` and returns the next free row.
///
/// # Layout
///
/// ```text
///  Biology                               3 / 12 · term first · starred only
/// ```
///
/// The right side wins when the line is too narrow; the title is clipped.
pub fn render_header(out: &mut String, row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let mut status = header.position.clone();
    for badge in &header.badges {
        status.push_str(" · ");
        status.push_str(badge);
    }
    let status = format!("{} ", clip(&status, cols.saturating_sub(1)));
    let title = clip(&format!(" {}", header.title), cols.saturating_sub(width(&status) + 1));

    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        out.push_str(&Theme::bg(bg));
    }

    out.push_str(&title);
    out.push_str(&" ".repeat(cols.saturating_sub(width(&title) + width(&status))));
    out.push_str(&status);

    out.push_str(Theme::reset());
    row + 1
}
