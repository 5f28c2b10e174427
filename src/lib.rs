//! Dictionary-based word-boundary detection for scripts without word
//! separators (Thai, Lao, Khmer, Burmese, CJK).
//!
//! The pieces, bottom up: [`trie`] holds the compiled word trie,
//! [`dict::DictionaryMatcher`] finds all dictionary words prefixing a
//! character run, [`engine::DictionaryBreakEngine`] locates spans of
//! dictionary characters and hands them to a per-script
//! [`engine::SegmentationPolicy`], and [`registry`] caches and dispatches
//! engines for a break-iterator framework.

#[cfg(not(target_endian = "little"))]
compile_error!("lexbreak requires a little-endian platform");

pub mod cursor;
pub mod dict;
pub mod engine;
pub mod registry;
pub mod trace_init;
pub mod trie;
pub mod unicode;

pub use dict::{DictError, DictionaryMatcher, ValueTransform};
pub use engine::{BreakEngine, BreakKind, DictionaryBreakEngine, ScanOutcome, SegmentationPolicy};
pub use registry::{EngineCache, EngineKey, EngineRegistry};
