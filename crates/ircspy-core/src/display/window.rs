//! Offset clamping and window slicing.

use super::WIDTH;

/// Clamps a raw scroll offset to a valid slice start for text of `len` chars.
///
/// The upper clamp runs first: for short text `len - WIDTH` is negative and
/// must itself be floored to zero by the lower clamp.
pub fn display_offset(len: usize, raw: isize) -> usize {
    let max = len as isize - WIDTH as isize;
    let mut offset = raw;
    if offset > max {
        offset = max;
    }
    if offset < 0 {
        offset = 0;
    }
    offset as usize
}

/// Returns exactly [`WIDTH`] characters of `text` starting at the clamped
/// offset, right-padded with spaces.
pub fn visible(text: &str, raw: isize) -> String {
    let start = display_offset(text.chars().count(), raw);
    let window: String = text.chars().skip(start).take(WIDTH).collect();
    format!("{window:<WIDTH$}")
}
