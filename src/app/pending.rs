//! Pending optimistic mutations.
//!
//! An optimistic update applies a change locally before the backing store
//! confirms it. [`PendingMutations`] keeps the snapshot taken just before each
//! such change, keyed by a [`MutationId`], until the store answers:
//!
//! ```text
//! begin(snapshot) ─► id ─► request in flight ─┬─► commit(id)   snapshot dropped
//!                                             └─► rollback(id) snapshot returned
//! ```
//!
//! Every mutation keeps its own snapshot. Rolling back one mutation while
//! another is still in flight restores the state from before the failed one
//! began, which also discards the later optimistic change locally.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of one in-flight mutation, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MutationId(u64);

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Snapshots of state taken before optimistic mutations, awaiting settlement.
///
/// # Examples
///
/// ```
/// use flashdeck::app::pending::PendingMutations;
///
/// let mut deck = vec![false, false];
/// let mut pending = PendingMutations::default();
///
/// let id = pending.begin(deck.clone());
/// deck[0] = true;
/// assert!(pending.is_active());
///
/// if let Some(snapshot) = pending.rollback(id) {
///     deck = snapshot;
/// }
/// assert_eq!(deck, vec![false, false]);
/// assert!(!pending.is_active());
/// ```
#[derive(Debug, Clone)]
pub struct PendingMutations<T> {
    next_id: u64,
    snapshots: BTreeMap<MutationId, T>,
}

impl<T> Default for PendingMutations<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            snapshots: BTreeMap::new(),
        }
    }
}

impl<T> PendingMutations<T> {
    /// Registers the state captured before a mutation and returns its id.
    pub fn begin(&mut self, snapshot: T) -> MutationId {
        let id = MutationId(self.next_id);
        self.next_id += 1;
        self.snapshots.insert(id, snapshot);
        id
    }

    /// Marks a mutation as confirmed and drops its snapshot.
    ///
    /// Returns `false` if the id is unknown (already settled or never begun).
    pub fn commit(&mut self, id: MutationId) -> bool {
        self.snapshots.remove(&id).is_some()
    }

    /// Marks a mutation as failed and hands back its snapshot for restoring.
    pub fn rollback(&mut self, id: MutationId) -> Option<T> {
        self.snapshots.remove(&id)
    }

    /// Returns `true` while at least one mutation awaits settlement.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.snapshots.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
