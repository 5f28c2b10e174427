//! Dictionary matching and compiled-dictionary storage.
//!
//! `DictionaryMatcher` wraps a [`CodeUnitTrie`] with a [`ValueTransform`]
//! and reports every dictionary word that is a prefix of a character run.
//! `to_bytes`/`from_bytes`/`open` read and write the compiled `LBDX` blob
//! format (header + CRC32 + bincode-encoded trie).

use std::fs::{self, File};
use std::io;
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use crate::trie::{CodeUnitTrie, TrieBuilder, TrieResult};

pub(crate) const MAGIC: &[u8; 4] = b"LBDX";
pub(crate) const VERSION: u8 = 1;
// 4 magic + 1 version + 1 trie kind + 2 reserved + 4 transform + 4 crc
pub(crate) const HEADER_SIZE: usize = 16;

const TRANSFORM_TYPE_MASK: u32 = 0xFF00_0000;
const TRANSFORM_OFFSET_MASK: u32 = 0x001F_FFFF;
const TRANSFORM_TYPE_NONE: u32 = 0;
const TRANSFORM_TYPE_OFFSET: u32 = 0x0100_0000;

/// Unified error type for compiled-dictionary binary I/O.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected LBDX)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("payload checksum mismatch")]
    ChecksumMismatch,

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Whether the trie is keyed by transformed bytes or by raw code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieKind {
    Bytes = 0,
    Chars = 1,
}

/// Code point -> trie unit policy, applied before every trie transition.
///
/// `Offset` compresses a script block into single-byte units: ZWJ and ZWNJ
/// get fixed slots 0xFF/0xFE, everything else must land in `0..=0xFD` after
/// subtracting the base. A code point that transforms out of range takes no
/// transition, which terminates the match (not an error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    Identity,
    Offset(u32),
}

impl ValueTransform {
    pub fn apply(self, c: char) -> Option<u32> {
        match self {
            ValueTransform::Identity => Some(u32::from(c)),
            ValueTransform::Offset(base) => match u32::from(c) {
                0x200D => Some(0xFF),
                0x200C => Some(0xFE),
                cp => match cp.checked_sub(base) {
                    Some(delta) if delta <= 0xFD => Some(delta),
                    _ => None,
                },
            },
        }
    }

    fn to_raw(self) -> u32 {
        match self {
            ValueTransform::Identity => TRANSFORM_TYPE_NONE,
            ValueTransform::Offset(base) => TRANSFORM_TYPE_OFFSET | (base & TRANSFORM_OFFSET_MASK),
        }
    }

    fn from_raw(raw: u32) -> Result<Self, DictError> {
        match raw & TRANSFORM_TYPE_MASK {
            TRANSFORM_TYPE_NONE => Ok(ValueTransform::Identity),
            TRANSFORM_TYPE_OFFSET => Ok(ValueTransform::Offset(raw & TRANSFORM_OFFSET_MASK)),
            other => Err(DictError::Parse(format!(
                "unknown transform type: {other:#x}"
            ))),
        }
    }

    fn kind(self) -> TrieKind {
        match self {
            ValueTransform::Identity => TrieKind::Chars,
            ValueTransform::Offset(_) => TrieKind::Bytes,
        }
    }
}

/// All dictionary words found as prefixes of one character run.
///
/// `lengths` are strictly ascending character counts, paired index-wise with
/// `values`. `consumed` is the total number of characters the trie walk
/// examined, which may exceed the longest recorded match.
#[derive(Debug, Default, Clone)]
pub struct DictionaryMatches {
    pub lengths: Vec<usize>,
    pub values: Vec<i32>,
    pub consumed: usize,
}

impl DictionaryMatches {
    pub fn count(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    fn record(&mut self, length: usize, value: i32, limit: usize) {
        if self.lengths.len() < limit {
            self.lengths.push(length);
            self.values.push(value);
        }
    }
}

/// Read-only dictionary: a trie plus the transform it was compiled with.
pub struct DictionaryMatcher {
    trie: CodeUnitTrie,
    transform: ValueTransform,
}

impl DictionaryMatcher {
    pub fn new(trie: CodeUnitTrie, transform: ValueTransform) -> Self {
        Self { trie, transform }
    }

    /// Compile a matcher from `(word, weight)` pairs. Weights must be
    /// non-negative; a word with a character outside the transform's range
    /// is rejected.
    pub fn from_words<'a>(
        words: impl IntoIterator<Item = (&'a str, i32)>,
        transform: ValueTransform,
    ) -> Result<Self, DictError> {
        let mut builder = TrieBuilder::new();
        for (word, weight) in words {
            if weight < 0 {
                return Err(DictError::Parse(format!(
                    "negative weight {weight} for {word:?}"
                )));
            }
            let units: Option<Vec<u32>> = word.chars().map(|c| transform.apply(c)).collect();
            let Some(units) = units else {
                return Err(DictError::Parse(format!(
                    "word {word:?} has a character outside the transform range"
                )));
            };
            if units.is_empty() {
                return Err(DictError::Parse("empty dictionary word".into()));
            }
            builder.insert(units, weight);
        }
        Ok(Self::new(builder.build(), transform))
    }

    pub fn transform(&self) -> ValueTransform {
        self.transform
    }

    pub fn trie_kind(&self) -> TrieKind {
        self.transform.kind()
    }

    pub fn trie(&self) -> &CodeUnitTrie {
        &self.trie
    }

    /// Find every dictionary word that is a prefix of `chars`.
    ///
    /// At most `max_length` characters are examined and at most `limit`
    /// match lengths recorded. Zero matches is a normal outcome. The walk
    /// may continue past the last recorded match while intermediate nodes
    /// still have continuations; `consumed` reports how far it got,
    /// including the character that ended the walk.
    pub fn matches(&self, chars: &[char], max_length: usize, limit: usize) -> DictionaryMatches {
        let mut out = DictionaryMatches::default();
        let mut cursor = self.trie.cursor();
        let max = max_length.min(chars.len());
        for (i, &c) in chars.iter().enumerate().take(max) {
            out.consumed = i + 1;
            let Some(unit) = self.transform.apply(c) else {
                break;
            };
            match cursor.step(unit) {
                TrieResult::NoMatch => break,
                TrieResult::NoValue => {}
                TrieResult::Intermediate(v) => out.record(i + 1, v, limit),
                TrieResult::FinalValue(v) => {
                    out.record(i + 1, v, limit);
                    break;
                }
            }
        }
        out
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DictError> {
        let payload = bincode::serialize(&self.trie).map_err(DictError::Serialize)?;
        let crc = crc32fast::hash(&payload);
        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.push(self.trie_kind() as u8);
        buf.extend_from_slice(&[0u8; 2]); // reserved
        buf.extend_from_slice(&self.transform.to_raw().to_ne_bytes());
        buf.extend_from_slice(&crc.to_ne_bytes());
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, DictError> {
        if data.len() < 5 {
            return Err(DictError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(DictError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(DictError::UnsupportedVersion(data[4]));
        }
        if data.len() < HEADER_SIZE {
            return Err(DictError::InvalidHeader);
        }
        let transform_raw = u32::from_ne_bytes(data[8..12].try_into().unwrap());
        let crc = u32::from_ne_bytes(data[12..16].try_into().unwrap());
        let transform = ValueTransform::from_raw(transform_raw)?;

        let payload = &data[HEADER_SIZE..];
        if crc32fast::hash(payload) != crc {
            return Err(DictError::ChecksumMismatch);
        }
        let trie: CodeUnitTrie = bincode::deserialize(payload).map_err(DictError::Deserialize)?;
        let matcher = Self::new(trie, transform);
        if data[5] != matcher.trie_kind() as u8 {
            return Err(DictError::Parse(format!(
                "trie kind byte {} does not match transform",
                data[5]
            )));
        }
        Ok(matcher)
    }

    /// Open a compiled dictionary file via mmap.
    ///
    /// The load happens once per engine; callers are expected to cache the
    /// result (see `registry::EngineCache`).
    pub fn open(path: &Path) -> Result<Self, DictError> {
        let file = File::open(path)?;
        // SAFETY: the file is opened read-only and the mapping is immutable
        // for the duration of the parse.
        let mmap = unsafe { Mmap::map(&file)? };
        let matcher = Self::from_bytes(&mmap)?;
        debug!(
            path = %path.display(),
            nodes = matcher.trie.node_count(),
            "dictionary loaded"
        );
        Ok(matcher)
    }

    pub fn save(&self, path: &Path) -> Result<(), DictError> {
        Ok(fs::write(path, self.to_bytes()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn sample() -> DictionaryMatcher {
        DictionaryMatcher::from_words(
            [("ab", 1), ("abc", 1), ("abcde", 2), ("c", 1)],
            ValueTransform::Identity,
        )
        .unwrap()
    }

    #[test]
    fn test_lengths_ascending_and_values() {
        let m = sample().matches(&chars("abcde"), 10, 10);
        assert_eq!(m.lengths, vec![2, 3, 5]);
        assert_eq!(m.values, vec![1, 1, 2]);
        for w in m.lengths.windows(2) {
            assert!(w[0] < w[1], "match lengths must be strictly ascending");
        }
    }

    #[test]
    fn test_limit_caps_count() {
        let m = sample().matches(&chars("abcde"), 10, 2);
        assert_eq!(m.lengths, vec![2, 3]);
        assert_eq!(m.count(), 2);
        // The walk still runs to the end of the input.
        assert_eq!(m.consumed, 5);
    }

    #[test]
    fn test_consumed_exceeds_longest_match() {
        let m = DictionaryMatcher::from_words([("ab", 1), ("abcd", 1)], ValueTransform::Identity)
            .unwrap();
        let r = m.matches(&chars("abcx"), 10, 10);
        assert_eq!(r.lengths, vec![2]);
        // "abc" is a live prefix, so the walk consumed 'c' and the failing 'x'.
        assert_eq!(r.consumed, 4);
    }

    #[test]
    fn test_max_length_bounds_walk() {
        let m = sample().matches(&chars("abcde"), 3, 10);
        assert_eq!(m.lengths, vec![2, 3]);
        assert_eq!(m.consumed, 3);
    }

    #[test]
    fn test_no_match_at_start() {
        let m = sample().matches(&chars("xyz"), 10, 10);
        assert!(m.is_empty());
        assert_eq!(m.consumed, 1);
    }

    #[test]
    fn test_empty_input() {
        let m = sample().matches(&[], 10, 10);
        assert!(m.is_empty());
        assert_eq!(m.consumed, 0);
    }

    #[test]
    fn test_offset_transform() {
        let t = ValueTransform::Offset(0x0E00);
        assert_eq!(t.apply('\u{0E01}'), Some(1)); // THAI CHARACTER KO KAI
        assert_eq!(t.apply('\u{200D}'), Some(0xFF)); // ZWJ
        assert_eq!(t.apply('\u{200C}'), Some(0xFE)); // ZWNJ
        assert_eq!(t.apply('a'), None); // below the base
        assert_eq!(t.apply('\u{0F00}'), None); // above 0xFD past the base
    }

    #[test]
    fn test_out_of_range_char_terminates_match() {
        let m = DictionaryMatcher::from_words(
            [("\u{0E01}\u{0E02}", 1)],
            ValueTransform::Offset(0x0E00),
        )
        .unwrap();
        let r = m.matches(&chars("\u{0E01}z"), 10, 10);
        assert!(r.is_empty());
        assert_eq!(r.consumed, 2);
    }

    #[test]
    fn test_from_words_rejects_out_of_range_word() {
        let err = DictionaryMatcher::from_words([("latin", 1)], ValueTransform::Offset(0x0E00));
        assert!(matches!(err, Err(DictError::Parse(_))));
    }

    #[test]
    fn test_blob_roundtrip() {
        let m = DictionaryMatcher::from_words(
            [("\u{0E01}\u{0E02}", 3), ("\u{0E01}", 7)],
            ValueTransform::Offset(0x0E00),
        )
        .unwrap();
        let bytes = m.to_bytes().unwrap();
        let back = DictionaryMatcher::from_bytes(&bytes).unwrap();
        assert_eq!(back.transform(), ValueTransform::Offset(0x0E00));
        assert_eq!(back.trie_kind(), TrieKind::Bytes);
        let r = back.matches(&chars("\u{0E01}\u{0E02}"), 10, 10);
        assert_eq!(r.lengths, vec![1, 2]);
        assert_eq!(r.values, vec![7, 3]);
    }

    #[test]
    fn test_open_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.dict");
        let m = sample();
        m.save(&path).unwrap();
        let back = DictionaryMatcher::open(&path).unwrap();
        assert_eq!(back.matches(&chars("abc"), 10, 10).lengths, vec![2, 3]);
    }

    #[test]
    fn test_invalid_magic() {
        let r = DictionaryMatcher::from_bytes(b"XXXX\x01\x01\0\0\0\0\0\0\0\0\0\0");
        assert!(matches!(r, Err(DictError::InvalidMagic)));
    }

    #[test]
    fn test_header_too_short() {
        let r = DictionaryMatcher::from_bytes(b"LBD");
        assert!(matches!(r, Err(DictError::InvalidHeader)));
    }

    #[test]
    fn test_unsupported_version() {
        let r = DictionaryMatcher::from_bytes(b"LBDX\x99\x01\0\0\0\0\0\0\0\0\0\0");
        assert!(matches!(r, Err(DictError::UnsupportedVersion(0x99))));
    }

    #[test]
    fn test_checksum_mismatch() {
        let mut bytes = sample().to_bytes().unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        let r = DictionaryMatcher::from_bytes(&bytes);
        assert!(matches!(
            r,
            Err(DictError::ChecksumMismatch) | Err(DictError::Deserialize(_))
        ));
    }
}
