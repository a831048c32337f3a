//! Study screen palettes.
//!
//! A [`Theme`] is a named set of hex colors, one per role on the study screen
//! (card frame, stars, toasts, term list selection). Two palettes ship inside
//! the binary; any other can be loaded from a TOML file named by the
//! `theme_file` config key.
//!
//! | Name | Look |
//! |------|------|
//! | `catppuccin-mocha` | dark, the default |
//! | `catppuccin-latte` | light, with a tinted header bar |
//!
//! A theme file has the shape of `themes/catppuccin-mocha.toml`: a `name` and
//! a `[colors]` table where every role except `header_bg` is required.
//!
//! Colors become 24-bit ANSI escapes through [`Theme::fg`] and [`Theme::bg`].
//! A malformed hex string renders as white instead of failing the frame.
//!
//! ```rust
//! use flashdeck::ui::Theme;
//!
//! let latte = Theme::from_name("catppuccin-latte").unwrap();
//! assert!(latte.colors.header_bg.is_some());
//! assert!(Theme::fg(&latte.colors.star_fg).starts_with("\u{1b}[38;2;"));
//! ```

use crate::domain::error::{FlashdeckError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const MOCHA: &str = include_str!("../../themes/catppuccin-mocha.toml");
const LATTE: &str = include_str!("../../themes/catppuccin-latte.toml");

/// Fallback for unparseable colors.
const WHITE: (u8, u8, u8) = (255, 255, 255);

/// A named palette.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex colors (`#rrggbb`) by screen role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Current row of the term list.
    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer, subtitles, definitions in the term list.
    pub text_dim: String,

    /// Separator lines.
    pub border: String,
    /// Frame around the card and the explanation panel.
    pub card_border: String,
    pub star_fg: String,

    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// Error toasts and failed explanations.
    pub error_fg: String,
    /// Info toasts.
    pub info_fg: String,
}

impl Theme {
    /// Returns the embedded palette called `name`, if there is one.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let embedded = [("catppuccin-mocha", MOCHA), ("catppuccin-latte", LATTE)];
        embedded
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .and_then(|(_, source)| toml::from_str(source).ok())
    }

    /// Reads a palette from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Io`] if the file cannot be read and
    /// [`FlashdeckError::Config`] if it is not a valid theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;

        toml::from_str(&contents).map_err(|e| FlashdeckError::Config(format!("failed to parse theme TOML: {e}")))
    }

    fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }

    fn escape(layer: u8, hex: &str) -> String {
        let (r, g, b) = Self::parse_hex(hex).unwrap_or(WHITE);
        format!("\u{1b}[{layer};2;{r};{g};{b}m")
    }

    /// Foreground escape for `hex`.
    ///
    /// ```rust
    /// use flashdeck::ui::Theme;
    ///
    /// assert_eq!(Theme::fg("#ff8000"), "\u{1b}[38;2;255;128;0m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        Self::escape(38, hex)
    }

    /// Background escape for `hex`.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        Self::escape(48, hex)
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{1b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{1b}[2m"
    }

    /// Ends every escape started by the helpers above.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{1b}[0m"
    }

    /// Palette identical to `themes/catppuccin-mocha.toml`, used if the
    /// embedded file ever fails to parse.
    fn mocha_fallback() -> Self {
        let color = |hex: &str| hex.to_string();
        Self {
            name: "catppuccin-mocha".to_string(),
            colors: ThemeColors {
                header_fg: color("#cdd6f4"),
                header_bg: None,
                selection_fg: color("#1e1e2e"),
                selection_bg: color("#b4befe"),
                text_normal: color("#cdd6f4"),
                text_dim: color("#6c7086"),
                border: color("#45475a"),
                card_border: color("#cba6f7"),
                star_fg: color("#f9e2af"),
                match_highlight_fg: color("#1e1e2e"),
                match_highlight_bg: color("#f9e2af"),
                empty_state_fg: color("#89b4fa"),
                error_fg: color("#f38ba8"),
                info_fg: color("#a6e3a1"),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_name("catppuccin-mocha").unwrap_or_else(Self::mocha_fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_themes_parse() {
        let mocha = Theme::from_name("catppuccin-mocha").unwrap();
        assert_eq!(mocha, Theme::mocha_fallback());

        let latte = Theme::from_name("catppuccin-latte").unwrap();
        assert_eq!(latte.colors.header_bg.as_deref(), Some("#e6e9ef"));

        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn invalid_hex_falls_back_to_white() {
        assert_eq!(Theme::fg("#12"), "\u{1b}[38;2;255;255;255m");
        assert_eq!(Theme::fg("#12345g"), "\u{1b}[38;2;255;255;255m");
        assert_eq!(Theme::fg("a6e3a1"), "\u{1b}[38;2;166;227;161m");
        assert_eq!(Theme::bg("zzzzzz"), "\u{1b}[48;2;255;255;255m");
        assert_eq!(Theme::bg("#1e1e2e"), "\u{1b}[48;2;30;30;46m");
    }

    #[test]
    fn custom_theme_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, MOCHA.replace("catppuccin-mocha", "custom")).unwrap();
        assert_eq!(Theme::from_file(&path).unwrap().name, "custom");

        fs::write(&path, "name = \"broken\"").unwrap();
        assert!(matches!(Theme::from_file(&path), Err(FlashdeckError::Config(_))));
    }
}
