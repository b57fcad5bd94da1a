//! Turns display state into frames on a sink.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::display::{DisplayState, Snapshot};
use crate::sink::DisplaySink;

/// Composes the two padded windows of a snapshot into one frame.
pub fn compose(snapshot: &Snapshot) -> String {
    format!("{}\n{}", snapshot.line1.window(), snapshot.line2.window())
}

pub struct Renderer<S> {
    state: Arc<DisplayState>,
    sink: S,
}

impl<S: DisplaySink> Renderer<S> {
    pub fn new(state: Arc<DisplayState>, sink: S) -> Self {
        Self { state, sink }
    }

    /// Clears the display and turns the backlight on.
    pub fn start(&mut self) -> Result<()> {
        self.sink.clear().context("clear display")?;
        self.sink.backlight(true).context("enable backlight")
    }

    /// Draws one frame.
    ///
    /// The state lock is released before the sink is touched. The display is
    /// only cleared when the text was replaced since the last frame; plain
    /// scrolling just rewrites from the home position.
    pub fn tick(&mut self) -> Result<()> {
        let snapshot = self.state.snapshot();
        if snapshot.clear {
            self.sink.clear().context("clear display")?;
        }
        self.sink.home().context("move display cursor home")?;
        self.sink
            .message(&compose(&snapshot))
            .context("write display frame")
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.sink.clear().context("clear display")?;
        self.sink.backlight(false).context("disable backlight")
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
