//! Infrastructure layer for filesystem, environment and terminal interactions.

pub mod paths;
pub mod terminal;

pub use paths::{default_store_path, expand_tilde, get_config_path, get_data_dir, log_path};
pub use terminal::{size_or, TerminalGuard};
