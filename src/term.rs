use crate::snake::Position;
use crate::{Coord, TermInt};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

/// What the game loop needs from a terminal.
pub trait Terminal {
    /// Returns a pending keystroke, or `None` without waiting.
    fn poll_key(&mut self) -> Result<Option<KeyEvent>>;
    fn clear(&mut self) -> Result<()>;
    /// Queues `text` with its first column at `pos`.
    fn print_at(&mut self, pos: Position, text: &str) -> Result<()>;
    fn present(&mut self) -> Result<()>;
}

pub struct TermManager {
    stdout: Stdout,
    active: bool,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout(), active: false }
    }

    pub fn setup(&mut self) -> Result<()> {
        self.active = true;
        execute!(self.stdout, EnterAlternateScreen).context("entering alternate screen")?;
        terminal::enable_raw_mode().context("enabling raw input mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("hiding cursor")?;
        Ok(())
    }

    /// Best effort: every step is attempted even if an earlier one fails.
    pub fn restore(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.stdout, cursor::Show, cursor::EnableBlinking);
        let _ = execute!(self.stdout, LeaveAlternateScreen);
    }

    pub fn get_terminal_size(&self) -> Result<(TermInt, TermInt)> {
        terminal::size().context("reading terminal size")
    }
}

impl Terminal for TermManager {
    fn poll_key(&mut self) -> Result<Option<KeyEvent>> {
        if !poll(Duration::from_millis(0)).context("polling input")? {
            return Ok(None);
        }

        match read().context("reading input")? {
            Event::Key(ev) => Ok(Some(ev)),
            _ => Ok(None),
        }
    }

    fn clear(&mut self) -> Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All)).context("clearing screen")?;
        Ok(())
    }

    fn print_at(&mut self, pos: Position, text: &str) -> Result<()> {
        // Off-screen cells can only appear on a terminal that shrank mid-game.
        let max = Coord::from(TermInt::MAX);
        if pos.x < 0 || pos.y < 0 || pos.x > max || pos.y > max {
            return Ok(());
        }

        queue!(self.stdout, cursor::MoveTo(pos.x as TermInt, pos.y as TermInt), style::Print(text))
            .context("drawing cell")?;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.stdout.flush().context("flushing frame")
    }
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn poll_key(&mut self) -> Result<Option<KeyEvent>> {
        (**self).poll_key()
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn print_at(&mut self, pos: Position, text: &str) -> Result<()> {
        (**self).print_at(pos, text)
    }

    fn present(&mut self) -> Result<()> {
        (**self).present()
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        self.restore();
    }
}
