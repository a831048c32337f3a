//! Shared rendering utilities and helpers.
//!
//! Low-level text utilities used across the UI components. Everything writes
//! into a frame buffer (`&mut String`) rather than stdout, so a whole frame can
//! be built, tested and flushed in one piece.
//!
//! # Features
//!
//! - **Match Highlighting**: Renders text with highlighted character ranges
//! - **Word Wrapping**: Splits card and explanation text to the frame width
//! - **UTF-8 Safe**: Operates on character indices, not byte indices
//!
//! # Example
//!
//! ```rust
//! use flashdeck::ui::helpers::push_highlighted;
//! use flashdeck::ui::Theme;
//!
//! let mut frame = String::new();
//! push_highlighted(&mut frame, "Mitochondria", &[(0, 4)], &Theme::default(), false);
//! assert!(frame.ends_with("chondria"));
//! ```

use crate::ui::theme::Theme;

/// Moves the cursor to a 1-indexed `row` and `col`.
pub fn position_cursor(out: &mut String, row: usize, col: usize) {
    out.push_str(&format!("\u{1b}[{row};{col}H"));
}

/// Display width of `text`, counted in characters.
#[must_use]
pub fn width(text: &str) -> usize {
    text.chars().count()
}

/// Cuts `text` to at most `max` characters.
#[must_use]
pub fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Pushes `text` centered in a line of `cols` characters, padded on both
/// sides. Text wider than the line is clipped.
pub fn push_centered(out: &mut String, text: &str, cols: usize) {
    let text = clip(text, cols);
    let len = width(&text);
    let padding = cols.saturating_sub(len) / 2;

    out.push_str(&" ".repeat(padding));
    out.push_str(&text);
    out.push_str(&" ".repeat(cols.saturating_sub(padding + len)));
}

/// Greedy word wrap to lines of at most `max` characters. Words longer than a
/// line are split. Blank input lines are kept as empty lines.
#[must_use]
pub fn wrap(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                lines.push(word.drain(..max).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }

            if line.is_empty() {
                line = word;
            } else if width(&line) + 1 + width(&word) <= max {
                line.push(' ');
                line.push_str(&word);
            } else {
                lines.push(std::mem::replace(&mut line, word));
            }
        }
        lines.push(line);
    }

    lines
}

/// Pushes text with highlighted character ranges for fuzzy matches.
///
/// Ranges are `(start, end)` character indices with an exclusive end. When
/// `is_selected` is `true`, highlighting is skipped so it does not fight the
/// selection background.
pub fn push_highlighted(out: &mut String, text: &str, ranges: &[(usize, usize)], theme: &Theme, is_selected: bool) {
    if ranges.is_empty() || is_selected {
        out.push_str(text);
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }

        out.extend(&chars[current_pos..start]);
        out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
        out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
        out.extend(&chars[start..end]);
        out.push_str(Theme::reset());
        out.push_str(&Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width_and_paragraphs() {
        assert_eq!(wrap("the quick brown fox", 9), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn centered_text_fills_the_line() {
        let mut out = String::new();
        push_centered(&mut out, "★ hi", 10);
        assert_eq!(out, "   ★ hi   ");
    }

    #[test]
    fn highlights_are_char_based_and_clamped() {
        let theme = Theme::default();
        let mut out = String::new();
        push_highlighted(&mut out, "éclair", &[(0, 2), (4, 99)], &theme, false);

        let plain = regex::Regex::new("\u{1b}\\[[0-9;]*m").unwrap().replace_all(&out, "");
        assert_eq!(plain, "éclair");
        assert!(out.contains(&Theme::bg(&theme.colors.match_highlight_bg)));
    }
}
