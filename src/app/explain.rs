//! Explanation panel state.
//!
//! Tracks the streamed explanation for the current card. The loading flag means
//! "request accepted, nothing received yet": it clears on the first chunk, not
//! when the stream ends. Responses are tagged with the [`RequestId`] they
//! belong to; anything tagged with a superseded or closed request is ignored.

use serde::{Deserialize, Serialize};

/// Text shown in place of the explanation when the stream fails.
pub const FAILURE_MESSAGE: &str = "Failed to generate explanation. Please try again.";

/// Identifier of one explanation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplanationState {
    next_id: u64,
    active: Option<RequestId>,

    pub is_open: bool,
    pub is_loading: bool,
    /// Term the explanation is for, shown as the panel title.
    pub term: String,
    /// Text received so far.
    pub text: String,
    /// Set when the stream failed; `text` is empty in that case.
    pub error: Option<String>,
    pub is_complete: bool,
}

impl ExplanationState {
    /// Opens the panel for `term` and returns the id of the new request.
    pub fn begin(&mut self, term: &str) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;

        self.active = Some(id);
        self.is_open = true;
        self.is_loading = true;
        self.term = term.to_string();
        self.text.clear();
        self.error = None;
        self.is_complete = false;
        id
    }

    fn is_current(&self, id: RequestId) -> bool {
        self.active == Some(id)
    }

    /// Appends a chunk. Returns `false` if the chunk was stale and dropped.
    pub fn on_chunk(&mut self, id: RequestId, chunk: &str) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.is_loading = false;
        self.text.push_str(chunk);
        true
    }

    /// Marks the stream complete.
    pub fn finish(&mut self, id: RequestId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.is_loading = false;
        self.is_complete = true;
        self.active = None;
        true
    }

    /// Discards the partial text and shows the failure message.
    pub fn fail(&mut self, id: RequestId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.is_loading = false;
        self.text.clear();
        self.error = Some(FAILURE_MESSAGE.to_string());
        self.active = None;
        true
    }

    /// Hides the panel. A stream still running for it is ignored from now on.
    pub fn close(&mut self) {
        self.is_open = false;
        self.is_loading = false;
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_clears_on_first_chunk_not_on_completion() {
        let mut state = ExplanationState::default();
        let id = state.begin("Atom");
        assert!(state.is_loading);

        assert!(state.on_chunk(id, "An atom "));
        assert!(!state.is_loading);
        assert!(!state.is_complete);

        state.on_chunk(id, "is small.");
        assert!(state.finish(id));
        assert_eq!(state.text, "An atom is small.");
        assert!(state.is_complete);
    }

    #[test]
    fn failure_discards_partial_text() {
        let mut state = ExplanationState::default();
        let id = state.begin("Atom");
        state.on_chunk(id, "partial");

        assert!(state.fail(id));
        assert!(state.text.is_empty());
        assert_eq!(state.error.as_deref(), Some(FAILURE_MESSAGE));
        assert!(state.is_open);
    }

    #[test]
    fn superseded_and_closed_requests_are_ignored() {
        let mut state = ExplanationState::default();
        let first = state.begin("Atom");
        let second = state.begin("Ion");

        assert!(!state.on_chunk(first, "stale"));
        assert!(!state.fail(first));
        assert!(state.on_chunk(second, "fresh"));
        assert_eq!(state.text, "fresh");

        state.close();
        assert!(!state.on_chunk(second, " more"));
        assert!(!state.is_open);
        assert_eq!(state.text, "fresh");
    }
}
