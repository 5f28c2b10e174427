//! Fallback engine for scripts with no dedicated break engine.
//!
//! When the framework meets a character nobody handles, it claims the
//! character's whole script here. `find_breaks` then swallows runs of
//! claimed characters without proposing any breaks (those stay the
//! responsibility of the rule-based iterator underneath), which guarantees
//! the framework always makes forward progress.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use unicode_script::{Script, UnicodeScript};

use crate::cursor;
use crate::engine::{BreakEngine, BreakKind, ScanOutcome};

pub struct UnhandledBreakEngine {
    /// Claimed scripts, per break kind. Interior mutability lets one shared
    /// instance keep claiming while break iterators hold it read-only.
    handled: [RwLock<HashSet<Script>>; BreakKind::COUNT],
}

impl Default for UnhandledBreakEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UnhandledBreakEngine {
    pub fn new() -> Self {
        Self {
            handled: std::array::from_fn(|_| RwLock::new(HashSet::new())),
        }
    }

    /// Claim the script of `c` for `kind`. Common, Inherited, and Unknown
    /// never get claimed: they carry no script of their own, and claiming
    /// them would swallow punctuation shared by every script.
    pub fn handle_char(&self, c: char, kind: BreakKind) {
        let script = c.script();
        if matches!(script, Script::Common | Script::Inherited | Script::Unknown) {
            return;
        }
        self.handled[kind.index()]
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(script);
    }
}

impl BreakEngine for UnhandledBreakEngine {
    fn handles(&self, c: char, kind: BreakKind) -> bool {
        self.handled[kind.index()]
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&c.script())
    }

    fn find_breaks(
        &self,
        text: &str,
        start_pos: usize,
        end_pos: usize,
        pos: usize,
        reverse: bool,
        kind: BreakKind,
        _breaks: &mut Vec<usize>,
    ) -> ScanOutcome {
        let mut current = pos;
        if reverse {
            while current > start_pos {
                let before = cursor::prev(text, current);
                match cursor::current(text, before) {
                    Some(c) if self.handles(c, kind) => current = before,
                    _ => break,
                }
            }
        } else {
            while current < end_pos
                && cursor::current(text, current).is_some_and(|c| self.handles(c, kind))
            {
                current = cursor::next(text, current);
            }
        }
        ScanOutcome {
            pos: current,
            breaks_found: 0,
        }
    }
}
