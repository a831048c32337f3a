//! Study session state and view model computation.
//!
//! This module defines [`StudySession`], the single authority over a study
//! view's in-memory state: the deck, navigation position, flip and filter
//! flags, the edit buffer, the explanation panel, and pending optimistic
//! mutations. It is the only writer of the deck; renderers only read the view
//! model computed from it.
//!
//! # Optimistic Updates
//!
//! Star toggles and content edits change the local deck first and return the
//! [`WorkerMessage`] that persists them. Before changing anything, the whole
//! deck is parked in [`PendingMutations`] under a fresh
//! [`MutationId`](super::pending::MutationId). When the worker answers,
//! [`StudySession::settle_mutation`] either drops the snapshot or restores it
//! and raises an error toast.
//!
//! # Invariants
//!
//! - `current_index` is a valid index into the active view, or 0 when the
//!   active view is empty
//! - at most one card is being edited
//! - navigation, mode toggles, shuffles and filter changes clear `is_flipped`
//! - changing the starred-only filter resets `current_index` to 0
//!
//! # Example
//!
//! ```rust
//! use flashdeck::app::StudySession;
//! use flashdeck::Flashcard;
//!
//! let mut session = StudySession::new("deck-1", Default::default());
//! session.deck_loaded("deck-1", vec![
//!     Flashcard::new("a", "Atom", "Smallest unit of matter", "deck-1"),
//!     Flashcard::new("b", "Ion", "Charged atom", "deck-1"),
//! ]);
//!
//! session.flip();
//! assert!(session.is_flipped());
//! session.next();
//! assert!(!session.is_flipped());
//! assert_eq!(session.current_card().map(|c| c.term.as_str()), Some("Ion"));
//! ```

use super::explain::{ExplanationState, RequestId};
use super::keymap::{FocusContext, Key};
use super::modes::{FrontFace, LoadState};
use super::notify::{Notifications, ToastLevel};
use super::pending::{MutationId, PendingMutations};
use super::prompt::{Prompt, PromptInput};
use super::term_list::TermList;
use crate::domain::{EditForm, Flashcard};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    CardView, EditorView, EmptyState, ExplanationView, FooterInfo, HeaderInfo, StudyViewModel, TermListView,
    TermRow, ToastView,
};
use crate::worker::WorkerMessage;
use rand::seq::SliceRandom;
use rand::Rng;

/// Deck captured before an optimistic mutation.
#[derive(Debug, Clone)]
struct DeckSnapshot {
    cards: Vec<Flashcard>,
    /// Toast text if the mutation is rolled back.
    failure: &'static str,
}

/// How the backing store answered a persisted mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Committed,
    Failed(String),
}

/// State of one study view over one deck.
#[derive(Debug, Clone)]
pub struct StudySession {
    deck_id: String,
    deck: Vec<Flashcard>,
    current_index: usize,
    is_flipped: bool,
    show_starred_only: bool,
    front: FrontFace,
    is_full_screen: bool,
    editing_id: Option<String>,
    edit_form: EditForm,
    pending: PendingMutations<DeckSnapshot>,
    load_state: LoadState,
    explanation: ExplanationState,
    notifications: Notifications,
    term_list: TermList,
    prompt: Option<Prompt>,

    /// Color scheme for UI rendering.
    pub theme: Theme,
}

impl StudySession {
    /// Creates a session for `deck_id` in the loading state.
    ///
    /// The deck is empty until [`deck_loaded`](Self::deck_loaded) is called
    /// with the worker's answer to the initial `LoadDeck` request.
    #[must_use]
    pub fn new(deck_id: impl Into<String>, theme: Theme) -> Self {
        Self {
            deck_id: deck_id.into(),
            deck: Vec::new(),
            current_index: 0,
            is_flipped: false,
            show_starred_only: false,
            front: FrontFace::default(),
            is_full_screen: false,
            editing_id: None,
            edit_form: EditForm::default(),
            pending: PendingMutations::default(),
            load_state: LoadState::Loading,
            explanation: ExplanationState::default(),
            notifications: Notifications::default(),
            term_list: TermList::default(),
            prompt: None,
            theme,
        }
    }

    /// Sets the number of rows per term list page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.term_list = TermList::new(page_size);
        self
    }

    /// Sets how long toasts stay visible.
    #[must_use]
    pub fn with_toast_ttl(mut self, ttl_secs: u64) -> Self {
        self.notifications = Notifications::new(ttl_secs);
        self
    }

    // ---- accessors -------------------------------------------------------

    #[must_use]
    pub fn deck_id(&self) -> &str {
        &self.deck_id
    }

    /// The full deck in its current order.
    #[must_use]
    pub fn deck(&self) -> &[Flashcard] {
        &self.deck
    }

    fn active_iter(&self) -> impl Iterator<Item = &Flashcard> + '_ {
        let starred_only = self.show_starred_only;
        self.deck.iter().filter(move |card| !starred_only || card.is_starred)
    }

    /// The active view: the whole deck, or only starred cards.
    #[must_use]
    pub fn active_deck(&self) -> Vec<&Flashcard> {
        self.active_iter().collect()
    }

    #[must_use]
    pub fn active_len(&self) -> usize {
        self.active_iter().count()
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Flashcard> {
        self.active_iter().nth(self.current_index)
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub const fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    #[must_use]
    pub const fn show_starred_only(&self) -> bool {
        self.show_starred_only
    }

    #[must_use]
    pub const fn front(&self) -> FrontFace {
        self.front
    }

    #[must_use]
    pub const fn is_full_screen(&self) -> bool {
        self.is_full_screen
    }

    #[must_use]
    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    #[must_use]
    pub const fn edit_form(&self) -> &EditForm {
        &self.edit_form
    }

    /// `true` while at least one persisted mutation awaits the store's answer.
    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.pending.is_active()
    }

    #[must_use]
    pub const fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    #[must_use]
    pub const fn explanation(&self) -> &ExplanationState {
        &self.explanation
    }

    #[must_use]
    pub const fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    #[must_use]
    pub const fn term_list(&self) -> &TermList {
        &self.term_list
    }

    /// `true` when every card is starred (and the deck is not empty).
    #[must_use]
    pub fn all_starred(&self) -> bool {
        !self.deck.is_empty() && self.deck.iter().all(|card| card.is_starred)
    }

    /// Focus state for the keyboard router's guard.
    #[must_use]
    pub fn focus_context(&self) -> FocusContext {
        FocusContext {
            text_input_focused: self.editing_id.is_some() || self.prompt.is_some(),
            modal_open: self.explanation.is_open,
            full_screen: self.is_full_screen,
        }
    }

    /// The footer prompt, if one is open.
    #[must_use]
    pub const fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    fn clamp_index(&mut self) {
        let len = self.active_len();
        self.current_index = if len == 0 { 0 } else { self.current_index.min(len - 1) };
    }

    // ---- lifecycle -------------------------------------------------------

    /// Installs the fetched deck. Answers for another deck are ignored.
    ///
    /// Snapshots of in-flight mutations and any open edit refer to the
    /// replaced cards, so both are dropped; later answers to those mutations
    /// are then ignored as unknown.
    pub fn deck_loaded(&mut self, deck_id: &str, cards: Vec<Flashcard>) -> bool {
        if deck_id != self.deck_id {
            tracing::debug!(expected = %self.deck_id, received = %deck_id, "ignoring deck for another session");
            return false;
        }

        tracing::debug!(deck_id = %deck_id, count = cards.len(), "deck loaded");
        self.deck = cards;
        self.load_state = LoadState::Ready;
        self.current_index = 0;
        self.is_flipped = false;
        self.pending = PendingMutations::default();
        self.cancel_edit();
        true
    }

    /// Records a failed deck fetch.
    pub fn load_failed(&mut self, deck_id: &str, message: &str) -> bool {
        if deck_id != self.deck_id {
            return false;
        }

        tracing::error!(deck_id = %deck_id, error = %message, "failed to fetch flashcards");
        self.load_state = LoadState::Failed(message.to_string());
        self.notifications.error("Failed to load flashcards");
        true
    }

    /// Expires old toasts. Returns `true` if the screen needs a redraw.
    pub fn tick(&mut self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.notifications.prune(now)
    }

    // ---- navigation ------------------------------------------------------

    /// Moves to the next card of the active view. No-op on the last card.
    pub fn next(&mut self) -> bool {
        if self.current_index + 1 >= self.active_len() {
            return false;
        }
        self.is_flipped = false;
        self.current_index += 1;
        true
    }

    /// Moves to the previous card of the active view. No-op on the first card.
    pub fn prev(&mut self) -> bool {
        if self.current_index == 0 {
            return false;
        }
        self.is_flipped = false;
        self.current_index -= 1;
        true
    }

    /// Turns the current card over.
    pub fn flip(&mut self) -> bool {
        if self.current_card().is_none() {
            return false;
        }
        self.is_flipped = !self.is_flipped;
        true
    }

    /// Swaps which face is the front.
    pub fn toggle_mode(&mut self) {
        self.front = self.front.toggled();
        self.is_flipped = false;
    }

    /// Switches between the full deck and the starred subset.
    pub fn set_show_starred_only(&mut self, starred_only: bool) {
        self.show_starred_only = starred_only;
        self.current_index = 0;
        self.is_flipped = false;
        tracing::debug!(starred_only = starred_only, active = self.active_len(), "filter changed");
    }

    pub fn toggle_starred_only(&mut self) {
        self.set_show_starred_only(!self.show_starred_only);
    }

    pub fn toggle_full_screen(&mut self) {
        self.is_full_screen = !self.is_full_screen;
    }

    /// Leaves full screen. Returns `false` if it was not on.
    pub fn exit_full_screen(&mut self) -> bool {
        std::mem::replace(&mut self.is_full_screen, false)
    }

    /// Shuffles the whole deck with the thread-local generator.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    /// Shuffles the whole deck (uniform Fisher-Yates) and returns to the first
    /// card. The new order is local to the session.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.deck.shuffle(rng);
        self.current_index = 0;
        self.is_flipped = false;
        tracing::debug!(count = self.deck.len(), "deck shuffled");
    }

    // ---- persisted mutations ---------------------------------------------

    fn begin_mutation(&mut self, failure: &'static str) -> MutationId {
        self.pending.begin(DeckSnapshot {
            cards: self.deck.clone(),
            failure,
        })
    }

    /// Flips the star of `card_id` locally and returns the request persisting it.
    ///
    /// Returns `None` for an unknown card.
    pub fn toggle_star(&mut self, card_id: &str) -> Option<WorkerMessage> {
        let position = self.deck.iter().position(|card| card.id == card_id)?;
        let is_starred = !self.deck[position].is_starred;

        let mutation = self.begin_mutation("Failed to update star");
        self.deck[position].is_starred = is_starred;
        self.clamp_index();

        tracing::debug!(card_id = %card_id, is_starred = is_starred, mutation = %mutation, "star toggled");
        Some(WorkerMessage::update_star(mutation, card_id, is_starred))
    }

    /// Toggles the star of the card currently shown.
    pub fn toggle_current_star(&mut self) -> Option<WorkerMessage> {
        let card_id = self.current_card()?.id.clone();
        self.toggle_star(&card_id)
    }

    /// Stars every card, or unstars every card when all are already starred.
    ///
    /// Returns `None` for an empty deck.
    pub fn toggle_all_stars(&mut self) -> Option<WorkerMessage> {
        if self.deck.is_empty() {
            return None;
        }
        let is_starred = !self.all_starred();

        let mutation = self.begin_mutation("Failed to update all stars");
        for card in &mut self.deck {
            card.is_starred = is_starred;
        }
        self.clamp_index();

        tracing::debug!(is_starred = is_starred, mutation = %mutation, "all stars toggled");
        Some(WorkerMessage::update_all_stars(mutation, self.deck_id.clone(), is_starred))
    }

    /// Commits or rolls back a persisted mutation.
    ///
    /// A rollback restores the whole deck as it was when the mutation began,
    /// re-clamps the position and raises an error toast. Unknown ids are
    /// ignored.
    pub fn settle_mutation(&mut self, mutation: MutationId, outcome: MutationOutcome) -> bool {
        match outcome {
            MutationOutcome::Committed => {
                let known = self.pending.commit(mutation);
                tracing::debug!(mutation = %mutation, known = known, "mutation committed");
                known
            }
            MutationOutcome::Failed(message) => {
                let Some(snapshot) = self.pending.rollback(mutation) else {
                    tracing::debug!(mutation = %mutation, "ignoring failure of unknown mutation");
                    return false;
                };

                tracing::error!(mutation = %mutation, error = %message, "mutation failed, rolling back");
                self.deck = snapshot.cards;
                self.clamp_index();
                let editing_vanished = self
                    .editing_id
                    .as_ref()
                    .is_some_and(|editing| !self.deck.iter().any(|card| &card.id == editing));
                if editing_vanished {
                    self.cancel_edit();
                }
                self.notifications.error(snapshot.failure);
                true
            }
        }
    }

    // ---- editing ---------------------------------------------------------

    /// Opens the edit form for `card_id`, discarding any other unsaved edit.
    pub fn start_edit(&mut self, card_id: &str) -> bool {
        let Some(card) = self.deck.iter().find(|card| card.id == card_id) else {
            return false;
        };
        self.edit_form = EditForm::from_card(card);
        self.editing_id = Some(card.id.clone());
        tracing::debug!(card_id = %card_id, "editing started");
        true
    }

    /// Opens the edit form for the card currently shown.
    pub fn start_edit_current(&mut self) -> bool {
        match self.current_card().map(|card| card.id.clone()) {
            Some(card_id) => self.start_edit(&card_id),
            None => false,
        }
    }

    /// Updates fields of the edit buffer. No-op when nothing is being edited.
    pub fn update_edit_form(&mut self, term: Option<&str>, definition: Option<&str>) {
        if self.editing_id.is_none() {
            return;
        }
        if let Some(term) = term {
            self.edit_form.term = term.to_string();
        }
        if let Some(definition) = definition {
            self.edit_form.definition = definition.to_string();
        }
    }

    /// Commits the edit buffer locally, leaves edit mode and returns the
    /// request persisting it.
    ///
    /// A blank term or definition keeps the form open and raises an error toast.
    pub fn save_edit(&mut self) -> Option<WorkerMessage> {
        let card_id = self.editing_id.clone()?;

        if !self.edit_form.is_complete() {
            self.notifications.error("Term and definition cannot be empty");
            return None;
        }

        let Some(position) = self.deck.iter().position(|card| card.id == card_id) else {
            self.cancel_edit();
            return None;
        };

        let term = self.edit_form.term.trim().to_string();
        let definition = self.edit_form.definition.trim().to_string();

        let mutation = self.begin_mutation("Failed to update flashcard");
        self.deck[position].term.clone_from(&term);
        self.deck[position].definition.clone_from(&definition);
        self.editing_id = None;
        self.edit_form = EditForm::default();

        tracing::debug!(card_id = %card_id, mutation = %mutation, "edit saved");
        Some(WorkerMessage::update_content(mutation, card_id, term, definition))
    }

    /// Leaves edit mode without saving.
    pub fn cancel_edit(&mut self) {
        self.editing_id = None;
        self.edit_form = EditForm::default();
    }

    // ---- explanation -----------------------------------------------------

    /// Opens the explanation panel for the current card and returns the
    /// streaming request. `None` when no card is shown.
    pub fn explain_concept(&mut self) -> Option<WorkerMessage> {
        let card = self.current_card()?;
        let (term, definition) = (card.term.clone(), card.definition.clone());

        let request = self.explanation.begin(&term);
        tracing::debug!(request = request.0, term = %term, "explanation requested");
        Some(WorkerMessage::explain(request, term, definition))
    }

    pub fn close_explanation(&mut self) {
        self.explanation.close();
    }

    pub fn explanation_chunk(&mut self, request: RequestId, text: &str) -> bool {
        self.explanation.on_chunk(request, text)
    }

    pub fn explanation_finished(&mut self, request: RequestId) -> bool {
        self.explanation.finish(request)
    }

    pub fn explanation_failed(&mut self, request: RequestId, message: &str) -> bool {
        if !self.explanation.fail(request) {
            return false;
        }
        tracing::error!(request = request.0, error = %message, "explanation failed");
        self.notifications.error("Failed to generate explanation");
        true
    }

    // ---- term list -------------------------------------------------------

    pub fn search_terms(&mut self, query: &str) {
        self.term_list.set_query(query);
    }

    pub fn term_page_next(&mut self) -> bool {
        self.term_list.next_page(&self.deck)
    }

    pub fn term_page_prev(&mut self) -> bool {
        self.term_list.prev_page(&self.deck)
    }

    // ---- prompt ----------------------------------------------------------

    pub fn open_prompt(&mut self, sigil: char) {
        self.prompt = Some(Prompt::open(sigil));
    }

    /// Types `key` into the open prompt and closes it on submit or cancel.
    /// A search prompt filters the term list on every keystroke, and
    /// cancelling it clears the filter. Returns `None` when no prompt is open.
    pub fn feed_prompt(&mut self, key: Key) -> Option<PromptInput> {
        let prompt = self.prompt.as_mut()?;
        let input = prompt.feed(key);
        let is_search = prompt.is_search();

        match &input {
            PromptInput::Editing if is_search => {
                let query = prompt.body().to_string();
                self.term_list.set_query(&query);
            }
            PromptInput::Editing => {}
            PromptInput::Cancelled => {
                if is_search {
                    self.term_list.set_query("");
                }
                self.prompt = None;
            }
            PromptInput::Submitted(_) => self.prompt = None,
        }
        Some(input)
    }

    /// Raises an error toast.
    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notifications.error(message);
    }

    // ---- view model ------------------------------------------------------

    /// Computes a renderable view model for a terminal of `rows` x `cols`.
    ///
    /// Term list rows are truncated to `cols`; `rows` limits how many lines of
    /// explanation text are kept.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> StudyViewModel {
        StudyViewModel {
            header: self.compute_header(),
            card: self.compute_card(),
            editor: self.editing_id.as_ref().map(|_| EditorView {
                term: self.edit_form.term.clone(),
                definition: self.edit_form.definition.clone(),
            }),
            term_list: self.compute_term_list(cols),
            explanation: self.compute_explanation(rows),
            toasts: self
                .notifications
                .toasts()
                .iter()
                .map(|toast| ToastView {
                    message: toast.message.clone(),
                    is_error: toast.level == ToastLevel::Error,
                })
                .collect(),
            footer: self.compute_footer(),
            empty_state: self.compute_empty_state(),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let active = self.active_len();
        let position = if active == 0 {
            "0 / 0".to_string()
        } else {
            format!("{} / {}", self.current_index + 1, active)
        };

        let mut badges = vec![self.front.label().to_string()];
        if self.show_starred_only {
            badges.push("starred only".to_string());
        }
        if self.is_updating() {
            badges.push("saving…".to_string());
        }

        HeaderInfo {
            title: self.deck_id.clone(),
            position,
            badges,
        }
    }

    fn compute_card(&self) -> Option<CardView> {
        let card = self.current_card()?;
        let shows_term = matches!(
            (self.front, self.is_flipped),
            (FrontFace::Term, false) | (FrontFace::Definition, true)
        );

        Some(CardView {
            face_label: if shows_term { "TERM" } else { "DEFINITION" },
            text: if shows_term { card.term.clone() } else { card.definition.clone() },
            is_starred: card.is_starred,
            is_flipped: self.is_flipped,
        })
    }

    fn compute_term_list(&self, cols: usize) -> Option<TermListView> {
        if self.is_full_screen {
            return None;
        }

        let page = self.term_list.visible(&self.deck);
        let current_id = self.current_card().map(|card| card.id.as_str());
        let term_width = (cols / 3).max(8);

        let rows = page
            .entries
            .iter()
            .map(|entry| TermRow {
                term: truncate(&entry.card.term, term_width),
                definition: truncate(&entry.card.definition, cols.saturating_sub(term_width + 6)),
                is_starred: entry.card.is_starred,
                is_current: current_id == Some(entry.card.id.as_str()),
                is_editing: self.editing_id.as_deref() == Some(entry.card.id.as_str()),
                highlight_ranges: entry.highlights.clone(),
            })
            .collect();

        Some(TermListView {
            rows,
            page: page.page + 1,
            page_count: page.page_count,
            toggle_all_label: if self.all_starred() { "Unstar all" } else { "Star all" },
            query: (!self.term_list.query().is_empty()).then(|| self.term_list.query().to_string()),
        })
    }

    fn compute_explanation(&self, rows: usize) -> Option<ExplanationView> {
        if !self.explanation.is_open {
            return None;
        }

        let (body, is_error) = match &self.explanation.error {
            Some(error) => (error.clone(), true),
            None => {
                let max_lines = rows.saturating_sub(6).max(3);
                let lines: Vec<&str> = self.explanation.text.lines().collect();
                let start = lines.len().saturating_sub(max_lines);
                (lines[start..].join("\n"), false)
            }
        };

        Some(ExplanationView {
            term: self.explanation.term.clone(),
            body,
            is_loading: self.explanation.is_loading,
            is_error,
        })
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = if self.prompt.is_some() {
            "Enter: run  Esc: cancel"
        } else if self.editing_id.is_some() {
            ":term=<text>  :definition=<text>  :w save  :q cancel"
        } else if self.explanation.is_open {
            "Esc/Enter: close explanation"
        } else if self.is_full_screen {
            "Space: flip  ←/→: navigate  s: star  e: explain  Esc: exit full screen  :quit"
        } else {
            "Space: flip  ←/→: navigate  s: star  r: shuffle  t: mode  q: starred  f: full  e: explain  \
             :edit  :all  /search  :] :[  :quit"
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
            prompt: self.prompt.as_ref().map(|prompt| prompt.text().to_string()),
        }
    }

    fn compute_empty_state(&self) -> Option<EmptyState> {
        match &self.load_state {
            LoadState::Loading => Some(EmptyState {
                message: "Loading flashcards…".to_string(),
                subtitle: String::new(),
            }),
            LoadState::Failed(message) => Some(EmptyState {
                message: "Failed to load flashcards".to_string(),
                subtitle: message.clone(),
            }),
            LoadState::Ready if self.deck.is_empty() => Some(EmptyState {
                message: "This deck has no flashcards".to_string(),
                subtitle: "Import a deck with `flashdeck import`".to_string(),
            }),
            LoadState::Ready if self.active_len() == 0 => Some(EmptyState {
                message: "No starred cards".to_string(),
                subtitle: "Press q to show all cards".to_string(),
            }),
            LoadState::Ready => None,
        }
    }
}

/// Shortens `text` to at most `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
