use super::{WIDTH, visible};

/// Extra ticks a scrolling line dwells at its first and last window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pauses {
    pub start: u16,
    pub end: u16,
}

impl Pauses {
    pub const DEFAULT: u16 = 3;

    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    fn reset_offset(self) -> isize {
        -(self.start as isize)
    }
}

impl Default for Pauses {
    fn default() -> Self {
        Self::new(Self::DEFAULT, Self::DEFAULT)
    }
}

/// One display line: its text and raw scroll offset.
///
/// The raw offset runs from `-pauses.start` to `len - WIDTH + pauses.end`
/// and is only clamped when slicing, which is what produces the dwell at
/// either edge. Not synchronized; [`super::DisplayState`] owns the lock.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    text: String,
    len: usize,
    offset: isize,
    pauses: Pauses,
}

impl LineBuffer {
    pub fn new(text: impl Into<String>, pauses: Pauses) -> Self {
        let text = text.into();
        Self {
            len: text.chars().count(),
            text,
            offset: pauses.reset_offset(),
            pauses,
        }
    }

    /// Replaces the text and rewinds to the start pause.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.len = self.text.chars().count();
        self.offset = self.pauses.reset_offset();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn offset(&self) -> isize {
        self.offset
    }

    pub fn pauses(&self) -> Pauses {
        self.pauses
    }

    /// The padded window for the current raw offset.
    pub fn window(&self) -> String {
        visible(&self.text, self.offset)
    }

    /// Moves one step along the scroll cycle.
    ///
    /// Text that fits the display never moves. Otherwise the offset
    /// increments and wraps back to the start pause once it passes the end
    /// pause.
    pub fn advance(&mut self) {
        let len = self.len as isize;
        let width = WIDTH as isize;
        if len > width {
            self.offset += 1;
        }
        if self.offset > len - width + self.pauses.end as isize {
            self.offset = self.pauses.reset_offset();
        }
    }
}
