//! Platform path resolution.
//!
//! Data and configuration live in the platform directories reported by
//! [`dirs`] (e.g. `~/.local/share/flashdeck` and `~/.config/flashdeck` on
//! Linux). When the platform reports none, the current directory is used.

use std::path::PathBuf;

const APP_DIR: &str = "flashdeck";

/// Returns the data directory holding the deck store and the log file.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

/// Returns the default configuration file path.
#[must_use]
pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

/// Default location of the JSON deck store.
#[must_use]
pub fn default_store_path() -> PathBuf {
    get_data_dir().join("decks.json")
}

/// Location of the rotating log file.
#[must_use]
pub fn log_path() -> PathBuf {
    get_data_dir().join("flashdeck.log")
}

/// Expands a leading `~` to the home directory.
///
/// # Examples
///
/// ```
/// use flashdeck::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// assert!(!expand_tilde("~/decks.json").starts_with("~"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };

    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_under_the_app_directory() {
        assert!(default_store_path().ends_with("flashdeck/decks.json"));
        assert!(log_path().ends_with("flashdeck/flashdeck.log"));
        assert!(get_config_path().ends_with("flashdeck/config.toml"));
    }

    #[test]
    fn only_leading_tilde_expands() {
        assert_eq!(expand_tilde("decks/~/x"), PathBuf::from("decks/~/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/a/b"), home.join("a/b"));
        }
    }
}
