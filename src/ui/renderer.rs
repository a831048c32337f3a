//! Top-level rendering coordinator.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `StudySession` into `StudyViewModel`
//! 2. **Component Rendering**: Delegate to the component layout
//!
//! The result is one ANSI string holding the whole frame. The caller decides
//! where it goes (stdout after a screen clear, or a test assertion).
//!
//! # Example
//!
//! ```rust
//! use flashdeck::app::StudySession;
//! use flashdeck::ui::render;
//!
//! let session = StudySession::new("deck-1", Default::default());
//! let frame = render(&session, 24, 80);
//! assert!(frame.contains("Loading flashcards"));
//! ```

use crate::app::StudySession;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::StudyViewModel;

/// Renders the study screen for a terminal of `rows` x `cols`.
#[must_use]
pub fn render(session: &StudySession, rows: usize, cols: usize) -> String {
    let viewmodel = session.compute_viewmodel(rows, cols);
    render_viewmodel(&viewmodel, &session.theme, rows, cols)
}

/// Renders a pre-computed view model.
#[must_use]
pub fn render_viewmodel(vm: &StudyViewModel, theme: &Theme, rows: usize, cols: usize) -> String {
    let _span = tracing::trace_span!("render", rows = rows, cols = cols).entered();
    components::render_study_screen(vm, theme, rows, cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::keymap::Key;
    use crate::app::{handle_event, Event};
    use crate::domain::Flashcard;
    use crate::worker::{WorkerMessage, WorkerResponse};
    use regex::Regex;

    fn plain(frame: &str) -> String {
        Regex::new("\u{1b}\\[[0-9;]*[A-Za-z]").unwrap().replace_all(frame, "").into_owned()
    }

    fn session() -> StudySession {
        let mut session = StudySession::new("Biology", Theme::default());
        session.deck_loaded(
            "Biology",
            vec![
                Flashcard::new("1", "Mitochondria", "Powerhouse of the cell", "Biology"),
                Flashcard::new("2", "Ribosome", "Builds proteins", "Biology"),
            ],
        );
        session
    }

    #[test]
    fn frame_shows_card_and_term_list() {
        let session = session();
        let frame = plain(&render(&session, 30, 100));

        assert!(frame.contains("Biology"));
        assert!(frame.contains("1 / 2"));
        assert!(frame.contains("TERM"));
        assert!(frame.contains("Terms  page 1/1  [Star all]"));
        assert!(frame.contains("› ☆ Mitochondria"));
        assert!(frame.contains("Ribosome"));
    }

    #[test]
    fn full_screen_hides_term_list() {
        let mut session = session();
        session.toggle_full_screen();
        let frame = plain(&render(&session, 30, 100));

        assert!(frame.contains("Mitochondria"));
        assert!(!frame.contains("Terms  page"));
        assert!(!frame.contains("Ribosome"));
    }

    #[test]
    fn failed_explanation_and_toast_are_visible() {
        let mut session = session();
        let (_, actions) = handle_event(&mut session, &Event::Key(Key::Char('e'))).unwrap();
        let [crate::app::Action::PostToWorker(WorkerMessage::Explain { request, .. })] = actions.as_slice() else {
            panic!("expected Explain");
        };

        let frame = plain(&render(&session, 30, 100));
        assert!(frame.contains("Explain · Mitochondria"));
        assert!(frame.contains("Generating explanation"));

        handle_event(
            &mut session,
            &Event::WorkerResponse(WorkerResponse::ExplanationFailed {
                request: *request,
                message: "quota".into(),
            }),
        )
        .unwrap();
        let frame = plain(&render(&session, 30, 100));
        assert!(frame.contains("Failed to generate explanation. Please try again."));
        assert!(frame.contains("✗ Failed to generate explanation"));
    }

    #[test]
    fn open_prompt_replaces_footer_hints() {
        let mut session = session();
        for key in [Key::Char(':'), Key::Char('e'), Key::Char('d')] {
            handle_event(&mut session, &Event::Key(key)).unwrap();
        }
        let frame = plain(&render(&session, 30, 100));
        assert!(frame.contains(":ed█"));
        assert!(frame.contains("Enter: run  Esc: cancel"));
        assert!(!frame.contains("r: shuffle"));
    }

    #[test]
    fn tiny_terminals_still_render() {
        let frame = render(&session(), 1, 1);
        assert!(plain(&frame).contains("Biology"));
    }
}
