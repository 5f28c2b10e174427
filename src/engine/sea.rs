//! Southeast Asian dictionary break engines.
//!
//! Thai, Lao, Khmer, and Burmese share the plain frequency DP; they differ
//! only in the script set they claim and the dictionary they are given.
//! Dictionaries for these scripts are compiled with an offset transform
//! whose base is the start of the script's Unicode block.

use unicode_script::Script;

use crate::dict::DictionaryMatcher;
use crate::engine::frequency::FrequencySegmenter;
use crate::engine::{BreakKind, DictionaryBreakEngine};

/// Offset-transform base for each supported script's dictionary.
pub const THAI_TRANSFORM_BASE: u32 = 0x0E00;
pub const LAO_TRANSFORM_BASE: u32 = 0x0E80;
pub const KHMER_TRANSFORM_BASE: u32 = 0x1780;
pub const BURMESE_TRANSFORM_BASE: u32 = 0x1000;

fn script_engine(script: Script, matcher: DictionaryMatcher) -> DictionaryBreakEngine {
    DictionaryBreakEngine::new(
        crate::unicode::CharacterSet::from_scripts(&[script]),
        &[BreakKind::Word, BreakKind::Line],
        Box::new(FrequencySegmenter::new(matcher)),
    )
}

pub fn thai(matcher: DictionaryMatcher) -> DictionaryBreakEngine {
    script_engine(Script::Thai, matcher)
}

pub fn lao(matcher: DictionaryMatcher) -> DictionaryBreakEngine {
    script_engine(Script::Lao, matcher)
}

pub fn khmer(matcher: DictionaryMatcher) -> DictionaryBreakEngine {
    script_engine(Script::Khmer, matcher)
}

pub fn burmese(matcher: DictionaryMatcher) -> DictionaryBreakEngine {
    script_engine(Script::Myanmar, matcher)
}
