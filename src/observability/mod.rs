//! File-based logging.
//!
//! All `tracing` output goes to a size-rotated log file so it never
//! interferes with the study screen.
//!
//! # Features
//!
//! - **File Output**: `<data_dir>/flashdeck.log`
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//! - **Level Control**: `RUST_LOG`, then the `trace_level` config option,
//!   then `"info"`
//!
//! # Usage
//!
//! ```rust
//! use flashdeck::observability::init_tracing;
//! use flashdeck::Config;
//!
//! init_tracing(&Config::default());
//! tracing::debug!("study session starting");
//! ```
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
