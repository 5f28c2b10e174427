//! Code-point stepping over `&str` byte offsets.
//!
//! Positions are byte offsets at character boundaries. Every function takes
//! an explicit index and returns the updated one; there is no shared mutable
//! cursor object. Stepping is by whole code points, so supplementary-plane
//! characters are handled correctly.

/// The character starting at `pos`, or `None` at (or past) the end.
pub fn current(text: &str, pos: usize) -> Option<char> {
    text.get(pos..).and_then(|rest| rest.chars().next())
}

/// Advance past the character at `pos`. Returns `pos` unchanged at the end.
pub fn next(text: &str, pos: usize) -> usize {
    match current(text, pos) {
        Some(c) => pos + c.len_utf8(),
        None => pos,
    }
}

/// Step back to the start of the character preceding `pos`. Returns `pos`
/// unchanged at the start.
pub fn prev(text: &str, pos: usize) -> usize {
    match text.get(..pos).and_then(|head| head.chars().next_back()) {
        Some(c) => pos - c.len_utf8(),
        None => pos,
    }
}
