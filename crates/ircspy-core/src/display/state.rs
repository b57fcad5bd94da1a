use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{LineBuffer, PLACEHOLDER, Pauses, visible};

/// Which of the two display lines to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    First,
    Second,
}

/// A copy of one line as observed by a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    pub text: String,
    /// Raw offset before this tick's advance.
    pub offset: isize,
}

impl LineView {
    pub fn window(&self) -> String {
        visible(&self.text, self.offset)
    }
}

/// Everything a renderer needs for one frame, detached from the lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub line1: LineView,
    pub line2: LineView,
    /// Set when the text was replaced since the previous snapshot.
    pub clear: bool,
}

#[derive(Debug)]
struct Lines {
    line1: LineBuffer,
    line2: LineBuffer,
    clear_requested: bool,
}

impl Lines {
    fn line_mut(&mut self, line: Line) -> &mut LineBuffer {
        match line {
            Line::First => &mut self.line1,
            Line::Second => &mut self.line2,
        }
    }
}

/// Two line buffers behind one lock.
///
/// Every method takes the lock for in-memory work only and hands out
/// copies, so callers never hold it across display I/O.
#[derive(Debug)]
pub struct DisplayState {
    inner: Mutex<Lines>,
}

impl DisplayState {
    pub fn new(pauses: Pauses) -> Self {
        Self::with_lines(PLACEHOLDER, "", pauses)
    }

    pub fn with_lines(line1: impl Into<String>, line2: impl Into<String>, pauses: Pauses) -> Self {
        Self {
            inner: Mutex::new(Lines {
                line1: LineBuffer::new(line1, pauses),
                line2: LineBuffer::new(line2, pauses),
                clear_requested: false,
            }),
        }
    }

    /// Replaces one line's text and rewinds its scroll position.
    pub fn set_line(&self, line: Line, text: impl Into<String>) {
        self.lock().line_mut(line).set_text(text);
    }

    /// Replaces both lines at once and asks the next frame to clear the
    /// display first.
    pub fn replace(&self, line1: impl Into<String>, line2: impl Into<String>) {
        let line1 = line1.into();
        let line2 = line2.into();
        let mut lines = self.lock();
        lines.line1.set_text(line1);
        lines.line2.set_text(line2);
        lines.clear_requested = true;
    }

    /// Copies both lines for rendering, then advances their offsets.
    pub fn snapshot(&self) -> Snapshot {
        let mut lines = self.lock();
        let snapshot = Snapshot {
            line1: view(&lines.line1),
            line2: view(&lines.line2),
            clear: std::mem::take(&mut lines.clear_requested),
        };
        lines.line1.advance();
        lines.line2.advance();
        snapshot
    }

    /// Current text of both lines.
    pub fn lines(&self) -> (String, String) {
        let lines = self.lock();
        (lines.line1.text().to_string(), lines.line2.text().to_string())
    }

    fn lock(&self) -> MutexGuard<'_, Lines> {
        // Line buffers are never left half-updated, so a poisoned lock is
        // still safe to use.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new(Pauses::default())
    }
}

fn view(line: &LineBuffer) -> LineView {
    LineView {
        text: line.text().to_string(),
        offset: line.offset(),
    }
}
