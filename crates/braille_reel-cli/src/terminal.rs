//! Terminal state for the duration of playback.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};

/// Hides the cursor and clears the screen; undoes both when dropped.
///
/// Raw mode is enabled so Ctrl-C arrives as a key press instead of a signal,
/// which lets the restore run on every exit path.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter<W: Write>(out: &mut W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self { _private: () };
        execute!(
            out,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            cursor::Show,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Sleeps up to `pause` waiting for input; true on Ctrl-C, `q` or Esc.
pub fn wait_for_interrupt(pause: Duration) -> io::Result<bool> {
    if !event::poll(pause)? {
        return Ok(false);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(match key.code {
            KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
            _ => false,
        }),
        _ => Ok(false),
    }
}
