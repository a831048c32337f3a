//! Actions representing side effects to be executed by the session runtime.
//!
//! This module defines the [`Action`] type, which represents imperative commands
//! produced by the event handler after processing user input or worker
//! responses. Actions bridge pure state transitions and effectful operations
//! like persistence calls or explanation streams.
//!
//! # Architecture
//!
//! The event handler returns a `Vec<Action>` after processing each event, allowing
//! multiple side effects to be queued atomically. The runtime loop in the binary
//! executes them in order.
//!
//! # Example
//!
//! ```rust
//! use flashdeck::app::Action;
//! use flashdeck::worker::WorkerMessage;
//!
//! let actions = vec![Action::PostToWorker(WorkerMessage::load_deck("deck-1"))];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Posts a message to the background worker thread.
    ///
    /// Used for every persisted mutation, the initial deck fetch and
    /// explanation streams, so the session loop never blocks on I/O.
    PostToWorker(WorkerMessage),

    /// Ends the study session and releases the worker.
    Exit,
}
