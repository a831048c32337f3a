//! Term list renderer.
//!
//! One title line with the page indicator, the star-all button label and the
//! active query, followed by one row per card on the page.
//!
//! # Row Format
//!
//! ```text
//! › ★ Mitochondria          Powerhouse of the cell
//! ```
//!
//! The current card is marked with `›` and drawn in selection colors. Matched
//! characters of the term are highlighted.

use crate::ui::helpers::{clip, position_cursor, push_highlighted, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{TermListView, TermRow};

/// Renders the list from `row` down to at most `last_row` (inclusive). Rows
/// that do not fit are dropped. Returns the next free row.
pub fn render_term_list(
    out: &mut String,
    row: usize,
    list: &TermListView,
    theme: &Theme,
    cols: usize,
    last_row: usize,
) -> usize {
    if row > last_row {
        return row;
    }

    let mut title = format!(" Terms  page {}/{}  [{}]", list.page, list.page_count, list.toggle_all_label);
    if let Some(query) = &list.query {
        title.push_str(&format!("  /{query}"));
    }
    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));
    out.push_str(&clip(&title, cols));
    out.push_str(Theme::reset());

    if list.rows.is_empty() {
        if row < last_row {
            position_cursor(out, row + 1, 1);
            out.push_str(&Theme::fg(&theme.colors.text_dim));
            out.push_str("   No matching terms");
            out.push_str(Theme::reset());
            return row + 2;
        }
        return row + 1;
    }

    let term_width = list.rows.iter().map(|r| width(&r.term)).max().unwrap_or(0);
    let mut current = row + 1;
    for term_row in &list.rows {
        if current > last_row {
            break;
        }
        render_term_row(out, current, term_row, term_width, theme, cols);
        current += 1;
    }
    current
}

fn render_term_row(out: &mut String, row: usize, term_row: &TermRow, term_width: usize, theme: &Theme, cols: usize) {
    position_cursor(out, row, 1);

    if term_row.is_current {
        out.push_str(&Theme::fg(&theme.colors.selection_fg));
        out.push_str(&Theme::bg(&theme.colors.selection_bg));
    } else {
        out.push_str(&Theme::fg(&theme.colors.text_normal));
    }

    out.push_str(if term_row.is_current { " › " } else { "   " });
    if term_row.is_starred {
        out.push_str(&Theme::fg(&theme.colors.star_fg));
        out.push('★');
        out.push_str(&Theme::fg(if term_row.is_current {
            &theme.colors.selection_fg
        } else {
            &theme.colors.text_normal
        }));
    } else {
        out.push('☆');
    }
    out.push(' ');

    push_highlighted(out, &term_row.term, &term_row.highlight_ranges, theme, term_row.is_current);
    out.push_str(&" ".repeat(term_width.saturating_sub(width(&term_row.term)) + 2));

    let used = 5 + term_width + 2;
    let definition = if term_row.is_editing {
        "(editing)".to_string()
    } else {
        term_row.definition.clone()
    };
    if !term_row.is_current {
        out.push_str(&Theme::fg(&theme.colors.text_dim));
    }
    let definition = clip(&definition, cols.saturating_sub(used));
    out.push_str(&definition);

    if term_row.is_current {
        out.push_str(&" ".repeat(cols.saturating_sub(used + width(&definition))));
    }
    out.push_str(Theme::reset());
}
