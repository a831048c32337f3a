//! Raw-mode terminal session.
//!
//! [`TerminalGuard`] switches the terminal into raw mode on the alternate
//! screen with the cursor hidden, and puts everything back when dropped. The
//! study loop holds one for its whole lifetime, so an early return through
//! `?` restores the terminal too.

use crate::domain::error::Result;
use crossterm::{cursor, execute, terminal};
use std::io::{self, Write};

/// Restores the terminal on drop.
#[derive(Debug)]
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Enters raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Fails when stdin is not a terminal or the escape sequences cannot be
    /// written. Raw mode is already undone in that case.
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        // Constructed before the screen switch so a failure below is undone.
        let guard = Self { _private: () };
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        tracing::debug!("terminal raw mode enabled");
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
        tracing::debug!("terminal restored");
    }
}

/// Current terminal size as `(rows, cols)`, or the given fallback when the
/// size cannot be read or is reported as zero.
#[must_use]
pub fn size_or(rows: usize, cols: usize) -> (usize, usize) {
    terminal::size()
        .ok()
        .filter(|(width, height)| *width > 0 && *height > 0)
        .map_or((rows, cols), |(width, height)| (usize::from(height), usize::from(width)))
}
