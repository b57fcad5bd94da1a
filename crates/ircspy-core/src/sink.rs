//! Display sinks: where composed frames end up.

use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, MoveToNextLine, Show};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

/// Capabilities of a two-line character display.
///
/// `message` receives two already padded lines separated by a single `\n`
/// and writes them from the current cursor position.
pub trait DisplaySink {
    fn clear(&mut self) -> Result<()>;

    /// Moves the write cursor back to the top-left cell.
    fn home(&mut self) -> Result<()>;

    fn backlight(&mut self, on: bool) -> Result<()>;

    fn message(&mut self, text: &str) -> Result<()>;
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn home(&mut self) -> Result<()> {
        (**self).home()
    }

    fn backlight(&mut self, on: bool) -> Result<()> {
        (**self).backlight(on)
    }

    fn message(&mut self, text: &str) -> Result<()> {
        (**self).message(text)
    }
}

/// Draws the display in the top-left corner of a terminal.
///
/// With the backlight off the frame is drawn blank and the cursor is
/// handed back to the terminal.
pub struct TerminalSink<W: Write = Stdout> {
    out: W,
    lit: bool,
}

impl TerminalSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, lit: true }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn clear(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0)).context("clear terminal")?;
        self.out.flush().context("flush terminal")
    }

    fn home(&mut self) -> Result<()> {
        queue!(self.out, MoveTo(0, 0)).context("move cursor home")
    }

    fn backlight(&mut self, on: bool) -> Result<()> {
        self.lit = on;
        let toggled = if on {
            queue!(self.out, Hide)
        } else {
            queue!(self.out, Show)
        };
        toggled.context("toggle terminal cursor")?;
        self.out.flush().context("flush terminal")
    }

    fn message(&mut self, text: &str) -> Result<()> {
        for (row, line) in text.split('\n').enumerate() {
            if row > 0 {
                queue!(self.out, MoveToNextLine(1)).context("move to next line")?;
            }
            let written = if self.lit {
                queue!(self.out, Print(line))
            } else {
                queue!(self.out, Print(" ".repeat(line.chars().count())))
            };
            written.context("write display line")?;
        }
        self.out.flush().context("flush terminal")
    }
}

/// Logs each distinct frame instead of drawing it. Used for headless runs.
#[derive(Debug, Default)]
pub struct LogSink {
    last: Option<String>,
}

impl DisplaySink for LogSink {
    fn clear(&mut self) -> Result<()> {
        tracing::debug!("display cleared");
        Ok(())
    }

    fn home(&mut self) -> Result<()> {
        Ok(())
    }

    fn backlight(&mut self, on: bool) -> Result<()> {
        tracing::debug!(on, "display backlight");
        Ok(())
    }

    fn message(&mut self, text: &str) -> Result<()> {
        if self.last.as_deref() == Some(text) {
            return Ok(());
        }
        let (line1, line2) = text.split_once('\n').unwrap_or((text, ""));
        tracing::info!(target: "ircspy::frame", "[{line1}] [{line2}]");
        self.last = Some(text.to_string());
        Ok(())
    }
}

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Clear,
    Home,
    Backlight(bool),
    Message(String),
}

/// Records every call. Used by tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    calls: Vec<SinkCall>,
}

impl MemorySink {
    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    /// Messages written so far, in order.
    pub fn frames(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Message(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_frame(&self) -> Option<&str> {
        self.frames().last().copied()
    }
}

impl DisplaySink for MemorySink {
    fn clear(&mut self) -> Result<()> {
        self.calls.push(SinkCall::Clear);
        Ok(())
    }

    fn home(&mut self) -> Result<()> {
        self.calls.push(SinkCall::Home);
        Ok(())
    }

    fn backlight(&mut self, on: bool) -> Result<()> {
        self.calls.push(SinkCall::Backlight(on));
        Ok(())
    }

    fn message(&mut self, text: &str) -> Result<()> {
        self.calls.push(SinkCall::Message(text.to_string()));
        Ok(())
    }
}
