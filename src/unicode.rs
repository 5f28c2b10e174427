//! Character-level classification for dictionary scripts.

use unicode_script::{Script, UnicodeScript};

/// Katakana in the sense of the CJK run heuristic: the fullwidth block minus
/// the middle dot, plus the halfwidth forms.
pub fn is_katakana(c: char) -> bool {
    (('\u{30A1}'..='\u{30FE}').contains(&c) && c != '\u{30FB}')
        || ('\u{FF66}'..='\u{FF9F}').contains(&c)
}

/// Immutable code-point set an engine claims ownership of: membership in any
/// of the listed scripts, or one of the explicitly added characters.
#[derive(Debug, Clone)]
pub struct CharacterSet {
    scripts: Vec<Script>,
    extras: Vec<char>,
}

impl CharacterSet {
    pub fn from_scripts(scripts: &[Script]) -> Self {
        Self {
            scripts: scripts.to_vec(),
            extras: Vec::new(),
        }
    }

    /// Add individual characters outside the listed scripts (e.g. prolonged
    /// sound marks, which are Script=Common).
    pub fn with_extras(mut self, extras: &[char]) -> Self {
        self.extras.extend_from_slice(extras);
        self.extras.sort_unstable();
        self
    }

    pub fn contains(&self, c: char) -> bool {
        self.extras.binary_search(&c).is_ok() || self.scripts.contains(&c.script())
    }
}
