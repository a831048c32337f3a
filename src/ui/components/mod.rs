//! Composable UI component renderers.
//!
//! Each component renders one part of the study screen into the frame buffer
//! and returns the next free row, so the layout function can stack them.
//!
//! # Components
//!
//! - [`header`]: Deck title, position and status badges
//! - [`card`]: The current card's visible face
//! - [`editor`]: Edit form of the card being edited
//! - [`term_list`]: Paginated list of every term
//! - [`explanation`]: Streamed explanation panel
//! - [`toast`]: Transient notifications
//! - [`footer`]: Keybinding hints
//! - [`empty`]: Message shown in place of the card
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Card]            full height in full screen
//! [Editor]          while editing
//! [Explanation]     while open, else [Term list] unless full screen
//! [Toasts]
//! [Border]
//! [Footer]
//! ```

mod card;
mod editor;
mod empty;
mod explanation;
mod footer;
mod header;
mod term_list;
mod toast;

use crate::ui::helpers::{clip, position_cursor, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::StudyViewModel;

use card::render_card;
use editor::render_editor;
use empty::render_empty_state;
use explanation::render_explanation;
use footer::render_footer;
use header::render_header;
use term_list::render_term_list;
use toast::render_toasts;

/// Columns left blank on each side of framed panels.
pub(crate) const FRAME_MARGIN: usize = 2;

/// Card height when the term list or explanation shares the screen.
const CARD_HEIGHT: usize = 7;

/// Smallest frame the layout is computed for; smaller terminals are drawn as
/// if they had this size and get clipped by the terminal.
pub const MIN_ROWS: usize = 12;
pub const MIN_COLS: usize = 32;

/// Renders a horizontal border line at `row` and returns the next row.
fn render_border(out: &mut String, row: usize, color: &str, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(color));
    out.push_str(&"─".repeat(cols));
    out.push_str(Theme::reset());
    row + 1
}

/// Top edge of a framed panel: `╭─ LABEL ───── ★ ─╮`.
pub(crate) fn render_frame_top(
    out: &mut String,
    row: usize,
    label: &str,
    badge: Option<(&str, &str)>,
    color: &str,
    cols: usize,
) {
    let frame_width = cols.saturating_sub(2 * FRAME_MARGIN);
    let label = clip(label, frame_width.saturating_sub(12));
    let badge_width = badge.map_or(0, |(text, _)| width(text) + 3);
    let fill = frame_width.saturating_sub(3 + width(&label) + 1 + badge_width + 1);

    position_cursor(out, row, FRAME_MARGIN + 1);
    out.push_str(&Theme::fg(color));
    out.push_str("╭─ ");
    out.push_str(Theme::bold());
    out.push_str(&label);
    out.push_str(Theme::reset());
    out.push_str(&Theme::fg(color));
    out.push(' ');
    out.push_str(&"─".repeat(fill));
    if let Some((text, badge_color)) = badge {
        out.push(' ');
        out.push_str(&Theme::fg(badge_color));
        out.push_str(text);
        out.push_str(&Theme::fg(color));
        out.push_str(" ─");
    }
    out.push('╮');
    out.push_str(Theme::reset());
}

/// Bottom edge of a framed panel with a dimmed hint: `╰───── hint ─╯`.
/// Returns the next row.
pub(crate) fn render_frame_bottom(out: &mut String, row: usize, hint: &str, color: &str, cols: usize) -> usize {
    let frame_width = cols.saturating_sub(2 * FRAME_MARGIN);
    let hint = clip(hint, frame_width.saturating_sub(6));
    let fill = frame_width.saturating_sub(1 + 1 + width(&hint) + 3);

    position_cursor(out, row, FRAME_MARGIN + 1);
    out.push_str(&Theme::fg(color));
    out.push('╰');
    out.push_str(&"─".repeat(fill));
    out.push(' ');
    out.push_str(Theme::dim());
    out.push_str(&hint);
    out.push_str(Theme::reset());
    out.push_str(&Theme::fg(color));
    out.push_str(" ─╯");
    out.push_str(Theme::reset());
    row + 1
}

/// Lays out the whole study screen for a terminal of `rows` x `cols`.
pub fn render_study_screen(vm: &StudyViewModel, theme: &Theme, rows: usize, cols: usize) -> String {
    let rows = rows.max(MIN_ROWS);
    let cols = cols.max(MIN_COLS);
    let mut out = String::new();

    let footer_row = rows;
    let border_row = footer_row - 1;
    let toast_row = border_row.saturating_sub(vm.toasts.len()).max(4);
    let last_content_row = toast_row - 1;

    let mut row = 2; // row 1 stays blank
    row = render_header(&mut out, row, &vm.header, theme, cols);
    row = render_border(&mut out, row, &theme.colors.border, cols);

    if let Some(empty) = &vm.empty_state {
        render_empty_state(&mut out, row + 2, empty, theme, cols);
    } else if let Some(card) = &vm.card {
        let editor_rows = if vm.editor.is_some() { 3 } else { 0 };
        let card_top = row + 1;
        let card_height = if vm.term_list.is_none() && vm.explanation.is_none() {
            (last_content_row + 1).saturating_sub(card_top + editor_rows)
        } else {
            CARD_HEIGHT
        };
        row = render_card(&mut out, card_top, card, theme, cols, card_height);

        if let Some(editor) = &vm.editor {
            row = render_editor(&mut out, row + 1, editor, theme, cols);
        }

        if let Some(explanation) = &vm.explanation {
            render_explanation(&mut out, row + 1, explanation, theme, cols, last_content_row);
        } else if let Some(list) = &vm.term_list {
            render_term_list(&mut out, row + 1, list, theme, cols, last_content_row);
        }
    }

    render_toasts(&mut out, toast_row, &vm.toasts, theme, cols);
    render_border(&mut out, border_row, &theme.colors.border, cols);
    render_footer(&mut out, footer_row, &vm.footer, theme, cols);
    out
}
