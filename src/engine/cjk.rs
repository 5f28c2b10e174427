//! Word break engine for Chinese and Japanese.
//!
//! Same frequency DP as the Southeast Asian engines, plus a katakana
//! heuristic: single-character katakana words are rare in Japanese, so every
//! maximal katakana run is offered as one candidate word with a cost that
//! depends only on its length.

use unicode_script::Script;

use crate::dict::DictionaryMatcher;
use crate::engine::frequency::FrequencySegmenter;
use crate::engine::{BreakKind, DictionaryBreakEngine, SegmentationPolicy};
use crate::unicode::{is_katakana, CharacterSet};

const MAX_KATAKANA_LENGTH: usize = 8;
const MAX_KATAKANA_GROUP_LENGTH: usize = 20;

// Cost by run length; runs longer than MAX_KATAKANA_LENGTH all pay the
// 1-character rate.
const KATAKANA_COST: [u32; MAX_KATAKANA_LENGTH + 1] =
    [8192, 984, 408, 240, 204, 252, 300, 372, 480];

fn katakana_run_cost(length: usize) -> u32 {
    if length > MAX_KATAKANA_LENGTH {
        KATAKANA_COST[0]
    } else {
        KATAKANA_COST[length]
    }
}

/// Frequency segmentation with the katakana-run post-pass.
pub struct CjkSegmenter {
    inner: FrequencySegmenter,
}

impl CjkSegmenter {
    pub fn new(matcher: DictionaryMatcher) -> Self {
        Self {
            inner: FrequencySegmenter::new(matcher),
        }
    }
}

/// Offer each maximal katakana run (below the group limit) as a candidate
/// word, possibly undercutting a chain of unknown single characters.
fn katakana_pass(chars: &[char], best: &mut [u32], prev: &mut [Option<usize>]) {
    let n = chars.len();
    let mut is_prev_katakana = false;
    for i in 0..n {
        let is_kat = is_katakana(chars[i]);
        if is_kat && !is_prev_katakana {
            let mut j = i + 1;
            while j < n && (j - i) < MAX_KATAKANA_GROUP_LENGTH && is_katakana(chars[j]) {
                j += 1;
            }
            if (j - i) < MAX_KATAKANA_GROUP_LENGTH {
                let cost = best[i].saturating_add(katakana_run_cost(j - i));
                if cost < best[j] {
                    best[j] = cost;
                    prev[j] = Some(i);
                }
            }
        }
        is_prev_katakana = is_kat;
    }
}

impl SegmentationPolicy for CjkSegmenter {
    fn segment(
        &self,
        text: &str,
        range_start: usize,
        range_end: usize,
        breaks: &mut Vec<usize>,
    ) -> usize {
        self.inner
            .divide(text, range_start, range_end, breaks, katakana_pass)
    }
}

/// CJK word break engine: Han, Hiragana, and Katakana, plus the prolonged
/// sound marks (Script=Common, so they need explicit listing).
pub fn cjk(matcher: DictionaryMatcher) -> DictionaryBreakEngine {
    let set = CharacterSet::from_scripts(&[Script::Han, Script::Hiragana, Script::Katakana])
        .with_extras(&['\u{30FC}', '\u{FF70}']);
    DictionaryBreakEngine::new(set, &[BreakKind::Word], Box::new(CjkSegmenter::new(matcher)))
}
