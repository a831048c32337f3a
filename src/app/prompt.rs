//! Command line typed into the footer.
//!
//! `:` opens a command prompt (`:edit`, `:term=...`, `:w`) and `/` opens a
//! search prompt. While a prompt is open every key goes to it, so no study
//! shortcut fires.

use super::keymap::Key;

/// What a key did to an open prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    /// The text changed or the key was ignored; the prompt stays open.
    Editing,
    /// Escape, or Backspace over the leading sigil.
    Cancelled,
    /// Enter. Carries the full text, sigil included.
    Submitted(String),
}

/// An open prompt. The text always starts with its sigil (`:` or `/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
}

impl Prompt {
    #[must_use]
    pub fn open(sigil: char) -> Self {
        Self { text: sigil.to_string() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text after the sigil.
    #[must_use]
    pub fn body(&self) -> &str {
        self.text.get(1..).unwrap_or_default()
    }

    #[must_use]
    pub fn is_search(&self) -> bool {
        self.text.starts_with('/')
    }

    /// Applies one key press.
    pub fn feed(&mut self, key: Key) -> PromptInput {
        match key {
            Key::Char(c) => self.text.push(c),
            Key::Space => self.text.push(' '),
            Key::Backspace => {
                if self.text.chars().count() <= 1 {
                    return PromptInput::Cancelled;
                }
                self.text.pop();
            }
            Key::Enter => return PromptInput::Submitted(self.text.clone()),
            Key::Esc => return PromptInput::Cancelled,
            Key::Left | Key::Right => {}
        }
        PromptInput::Editing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(prompt: &mut Prompt, text: &str) {
        for c in text.chars() {
            let key = if c == ' ' { Key::Space } else { Key::Char(c) };
            assert_eq!(prompt.feed(key), PromptInput::Editing);
        }
    }

    #[test]
    fn typed_command_is_submitted_with_sigil() {
        let mut prompt = Prompt::open(':');
        type_text(&mut prompt, "term=Noble gas");
        assert_eq!(prompt.body(), "term=Noble gas");
        assert_eq!(prompt.feed(Key::Enter), PromptInput::Submitted(":term=Noble gas".into()));
    }

    #[test]
    fn backspace_edits_then_cancels_at_sigil() {
        let mut prompt = Prompt::open('/');
        type_text(&mut prompt, "ab");
        assert_eq!(prompt.feed(Key::Backspace), PromptInput::Editing);
        assert_eq!(prompt.text(), "/a");
        assert_eq!(prompt.feed(Key::Backspace), PromptInput::Editing);
        assert_eq!(prompt.feed(Key::Backspace), PromptInput::Cancelled);
        assert!(prompt.is_search());
    }

    #[test]
    fn arrows_are_ignored_and_escape_cancels() {
        let mut prompt = Prompt::open(':');
        assert_eq!(prompt.feed(Key::Left), PromptInput::Editing);
        assert_eq!(prompt.text(), ":");
        assert_eq!(prompt.feed(Key::Esc), PromptInput::Cancelled);
    }
}
