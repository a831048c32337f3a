//! Background worker thread for deck persistence and explanation streams.
//!
//! This module implements the worker thread that handles all gateway I/O so
//! the interactive session loop never blocks on the network or the disk.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types
//! - `handler`: Worker implementation and message processing logic
//! - `runtime`: Thread spawning, message posting and shutdown

pub mod handler;
pub mod messages;
pub mod runtime;

pub use handler::DeckWorker;
pub use messages::{WorkerMessage, WorkerResponse};
pub use runtime::WorkerHandle;
