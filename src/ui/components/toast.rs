//! Toast notification renderer.

use crate::ui::helpers::{clip, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ToastView;

/// Renders one toast per row starting at `row`, newest last.
pub fn render_toasts(out: &mut String, row: usize, toasts: &[ToastView], theme: &Theme, cols: usize) -> usize {
    for (offset, toast) in toasts.iter().enumerate() {
        let (marker, color) = if toast.is_error {
            ("✗", &theme.colors.error_fg)
        } else {
            ("✓", &theme.colors.info_fg)
        };

        position_cursor(out, row + offset, 1);
        out.push_str(&Theme::fg(color));
        out.push_str(&clip(&format!(" {marker} {}", toast.message), cols));
        out.push_str(Theme::reset());
    }
    row + toasts.len()
}
