//! View model types representing renderable UI state.
//!
//! View models are computed from session state by
//! [`StudySession::compute_viewmodel`](crate::app::StudySession::compute_viewmodel)
//! and consumed by the renderer. They contain no business logic, only
//! display-ready data: which face of the card is showing, which rows of the
//! term list are visible, which toasts are live.

/// Complete UI view model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyViewModel {
    pub header: HeaderInfo,

    /// Card being studied. `None` while loading or when the active view is empty.
    pub card: Option<CardView>,

    /// Edit form, present while a card is being edited.
    pub editor: Option<EditorView>,

    /// Term list. `None` in full screen.
    pub term_list: Option<TermListView>,

    /// Explanation panel, present while open.
    pub explanation: Option<ExplanationView>,

    pub toasts: Vec<ToastView>,

    pub footer: FooterInfo,

    /// Message shown in place of the card.
    pub empty_state: Option<EmptyState>,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Deck title or id.
    pub title: String,
    /// Position within the active view, e.g. `3 / 12`.
    pub position: String,
    /// Status flags: front face, starred-only, saving.
    pub badges: Vec<String>,
}

/// The face of the current card that is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// `TERM` or `DEFINITION`.
    pub face_label: &'static str,
    pub text: String,
    pub is_starred: bool,
    pub is_flipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView {
    pub term: String,
    pub definition: String,
}

/// One row of the term list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRow {
    pub term: String,
    pub definition: String,
    pub is_starred: bool,
    /// The row is the card currently shown.
    pub is_current: bool,
    pub is_editing: bool,
    /// Character ranges of `term` matching the search query.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermListView {
    pub rows: Vec<TermRow>,
    /// One-based page number for display.
    pub page: usize,
    pub page_count: usize,
    /// `Star all` or `Unstar all`.
    pub toggle_all_label: &'static str,
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationView {
    pub term: String,
    pub body: String,
    pub is_loading: bool,
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub message: String,
    pub is_error: bool,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text for the current focus.
    pub keybindings: String,
    /// Text of the open prompt, sigil included.
    pub prompt: Option<String>,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No starred cards").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}
