//! Engine lookup and caching.
//!
//! Building a dictionary engine means loading and decoding a compiled blob,
//! so engines are created once and shared. `EngineCache` is an explicit
//! object handed to whoever resolves engines (no process-wide statics) and
//! enforces single-flight loading: the first caller for a key runs the
//! loader while any concurrent callers for the same key block until the
//! engine is ready.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, PoisonError};

use tracing::debug;
use unicode_script::{Script, UnicodeScript};

use crate::dict::DictError;
use crate::engine::{BreakEngine, BreakKind, ScanOutcome};
use crate::engine::unhandled::UnhandledBreakEngine;

pub type SharedEngine = Arc<dyn BreakEngine>;

/// Cache key: which script's engine, for which iteration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineKey {
    pub script: Script,
    pub kind: BreakKind,
}

enum Slot {
    /// A loader is running on some thread; wait on the condvar.
    Loading,
    Ready(SharedEngine),
}

#[derive(Default)]
pub struct EngineCache {
    slots: Mutex<HashMap<EngineKey, Slot>>,
    ready: Condvar,
}

impl EngineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached engine for `key`, or run `load` to create it.
    ///
    /// At most one loader runs per key at a time. A failed load clears the
    /// slot and returns the error, so a later call may retry.
    pub fn get_or_load<F>(&self, key: EngineKey, load: F) -> Result<SharedEngine, DictError>
    where
        F: FnOnce() -> Result<SharedEngine, DictError>,
    {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            match slots.get(&key) {
                Some(Slot::Ready(engine)) => return Ok(Arc::clone(engine)),
                Some(Slot::Loading) => {
                    slots = self
                        .ready
                        .wait(slots)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                None => break,
            }
        }
        slots.insert(key, Slot::Loading);
        drop(slots);

        let result = load();

        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match &result {
            Ok(engine) => {
                slots.insert(key, Slot::Ready(Arc::clone(engine)));
                debug!(?key, "engine loaded");
            }
            Err(_) => {
                slots.remove(&key);
            }
        }
        drop(slots);
        self.ready.notify_all();
        result
    }
}

/// Ordered engine list with the unhandled-character fallback.
///
/// `engine_for` returns the first registered engine whose `handles` matches;
/// when none does, the character's script is claimed by the fallback so the
/// framework never stalls on it again.
#[derive(Default)]
pub struct EngineRegistry {
    engines: Vec<SharedEngine>,
    unhandled: UnhandledBreakEngine,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, engine: SharedEngine) {
        self.engines.push(engine);
    }

    pub fn engine_for(&self, c: char, kind: BreakKind) -> &dyn BreakEngine {
        for engine in &self.engines {
            if engine.handles(c, kind) {
                return engine.as_ref();
            }
        }
        self.unhandled.handle_char(c, kind);
        debug!(script = ?c.script(), ?kind, "no dedicated engine, using fallback");
        &self.unhandled
    }

    pub fn unhandled(&self) -> &UnhandledBreakEngine {
        &self.unhandled
    }

    /// Run the matching engine at `pos`, appending breaks and returning the
    /// advanced position. A position whose character no engine consumes is
    /// advanced by one character so callers always make progress.
    pub fn find_breaks(
        &self,
        text: &str,
        start_pos: usize,
        end_pos: usize,
        pos: usize,
        kind: BreakKind,
        breaks: &mut Vec<usize>,
    ) -> ScanOutcome {
        let Some(c) = crate::cursor::current(text, pos) else {
            return ScanOutcome {
                pos,
                breaks_found: 0,
            };
        };
        let engine = self.engine_for(c, kind);
        let out = engine.find_breaks(text, start_pos, end_pos, pos, false, kind, breaks);
        if out.pos == pos {
            ScanOutcome {
                pos: crate::cursor::next(text, pos),
                breaks_found: out.breaks_found,
            }
        } else {
            out
        }
    }
}
