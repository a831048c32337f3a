//! Terminal input translation.
//!
//! Maps raw-mode `crossterm` events onto [`Event`]s. Key presses become
//! [`Key`]s, so the binding table in [`keymap`](super::keymap) never sees a
//! terminal type. `Ctrl-C` ends the session, since raw mode disables the
//! signal.

use super::handler::Event;
use super::keymap::Key;
use crossterm::event::{Event as TerminalEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Translates one terminal event. Returns `None` for events the session has
/// no use for (mouse, focus, key releases, unmapped keys).
#[must_use]
pub fn translate(event: &TerminalEvent) -> Option<Event> {
    match event {
        TerminalEvent::Key(key) => translate_key(key),
        TerminalEvent::Resize(cols, rows) => Some(Event::Resize {
            rows: usize::from(*rows),
            cols: usize::from(*cols),
        }),
        _ => None,
    }
}

fn translate_key(event: &KeyEvent) -> Option<Event> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) && matches!(event.code, KeyCode::Char('c' | 'C')) {
        return Some(Event::Exit);
    }

    let key = match event.code {
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        _ => return None,
    };
    Some(Event::Key(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> TerminalEvent {
        TerminalEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn study_keys_map_one_to_one() {
        let cases = [
            (KeyCode::Char('s'), Key::Char('s')),
            (KeyCode::Char('S'), Key::Char('S')),
            (KeyCode::Char(' '), Key::Space),
            (KeyCode::Enter, Key::Enter),
            (KeyCode::Left, Key::Left),
            (KeyCode::Right, Key::Right),
            (KeyCode::Esc, Key::Esc),
            (KeyCode::Backspace, Key::Backspace),
        ];
        for (code, key) in cases {
            assert_eq!(translate(&press(code)), Some(Event::Key(key)), "{code:?}");
        }
    }

    #[test]
    fn ctrl_c_exits_and_releases_are_dropped() {
        let interrupt = TerminalEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(translate(&interrupt), Some(Event::Exit));

        let mut release = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate(&TerminalEvent::Key(release)), None);

        assert_eq!(translate(&press(KeyCode::Up)), None);
        assert_eq!(translate(&TerminalEvent::FocusGained), None);
    }

    #[test]
    fn resize_reports_rows_then_cols() {
        assert_eq!(
            translate(&TerminalEvent::Resize(120, 40)),
            Some(Event::Resize { rows: 40, cols: 120 })
        );
    }
}
