pub(crate) mod line;
pub(crate) mod state;
pub(crate) mod window;

pub use line::{LineBuffer, Pauses};
pub use state::{DisplayState, Line, LineView, Snapshot};
pub use window::{display_offset, visible};

/// Number of characters per display line.
pub const WIDTH: usize = 16;

/// Text shown on the first line before any event arrives.
pub const PLACEHOLDER: &str = "IRC Spy: INIT";
