//! Break engines: the dispatch trait, the span-scan driver, and the
//! per-script segmentation policies.
//!
//! A break-iterator framework asks [`BreakEngine::handles`] to pick an
//! engine for the character under its cursor, then calls
//! [`BreakEngine::find_breaks`] to let the engine consume a run of text and
//! append boundary offsets. The output vec is append-only: an engine never
//! clears or reorders what callers already put there.

pub mod cjk;
pub mod frequency;
pub mod sea;
pub mod unhandled;

use tracing::debug_span;

use crate::cursor;
use crate::unicode::CharacterSet;

/// Break-iteration kinds, usable both as array index and `1 << kind` mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BreakKind {
    Grapheme = 0,
    Word = 1,
    Line = 2,
    Sentence = 3,
    Title = 4,
}

impl BreakKind {
    pub const COUNT: usize = 5;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn mask(self) -> u32 {
        1 << (self as u32)
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Self::Grapheme),
            1 => Some(Self::Word),
            2 => Some(Self::Line),
            3 => Some(Self::Sentence),
            4 => Some(Self::Title),
            _ => None,
        }
    }
}

/// Where `find_breaks` left the caller's cursor, and how many breaks it
/// appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    pub pos: usize,
    pub breaks_found: usize,
}

/// One language break engine, as seen by the owning break-iterator
/// framework.
pub trait BreakEngine: Send + Sync {
    /// Dispatch predicate: does this engine own `c` for iteration kind
    /// `kind`?
    fn handles(&self, c: char, kind: BreakKind) -> bool;

    /// Consume a run of text starting at `pos` and append break offsets.
    ///
    /// `start_pos`/`end_pos` are the caller-imposed limits of the scan.
    /// When `reverse`, the run extends backward from `pos` toward
    /// `start_pos`. Appended offsets lie strictly inside the consumed run;
    /// pre-existing contents of `breaks` are preserved.
    fn find_breaks(
        &self,
        text: &str,
        start_pos: usize,
        end_pos: usize,
        pos: usize,
        reverse: bool,
        kind: BreakKind,
        breaks: &mut Vec<usize>,
    ) -> ScanOutcome;
}

/// Word segmentation over one located span. Implementations append break
/// offsets strictly inside `(range_start, range_end)` and return how many
/// they appended; a `range_start >= range_end` span yields zero.
pub trait SegmentationPolicy: Send + Sync {
    fn segment(
        &self,
        text: &str,
        range_start: usize,
        range_end: usize,
        breaks: &mut Vec<usize>,
    ) -> usize;
}

/// Generic dictionary break engine: locates the maximal span of set-member
/// characters around the cursor, then hands it to the segmentation policy.
///
/// Holds no per-call state; the set and policy are immutable after
/// construction, so one engine instance is shared across threads.
pub struct DictionaryBreakEngine {
    set: CharacterSet,
    kinds: u32,
    policy: Box<dyn SegmentationPolicy>,
}

impl DictionaryBreakEngine {
    pub fn new(set: CharacterSet, kinds: &[BreakKind], policy: Box<dyn SegmentationPolicy>) -> Self {
        let kinds = kinds.iter().fold(0, |mask, k| mask | k.mask());
        Self { set, kinds, policy }
    }

    pub fn character_set(&self) -> &CharacterSet {
        &self.set
    }
}

impl BreakEngine for DictionaryBreakEngine {
    fn handles(&self, c: char, kind: BreakKind) -> bool {
        self.kinds & kind.mask() != 0 && self.set.contains(c)
    }

    fn find_breaks(
        &self,
        text: &str,
        start_pos: usize,
        end_pos: usize,
        pos: usize,
        reverse: bool,
        _kind: BreakKind,
        breaks: &mut Vec<usize>,
    ) -> ScanOutcome {
        let _span = debug_span!("find_breaks", pos, reverse).entered();
        let start = pos;
        let mut current = pos;
        let (range_start, range_end);
        if reverse {
            let mut is_dict = cursor::current(text, current)
                .is_some_and(|c| self.set.contains(c));
            while current > start_pos && is_dict {
                current = cursor::prev(text, current);
                is_dict = cursor::current(text, current)
                    .is_some_and(|c| self.set.contains(c));
            }
            range_start = if current < start_pos {
                start_pos
            } else if is_dict {
                current
            } else {
                cursor::next(text, current)
            };
            range_end = cursor::next(text, start);
        } else {
            while current < end_pos
                && cursor::current(text, current).is_some_and(|c| self.set.contains(c))
            {
                current = cursor::next(text, current);
            }
            range_start = start;
            range_end = current;
        }

        let breaks_found = self.policy.segment(text, range_start, range_end, breaks);
        ScanOutcome {
            pos: current,
            breaks_found,
        }
    }
}
