use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace};

use crate::compiled::CompiledPattern;
use crate::error::Result;

/// Compiled patterns keyed by the verbatim pattern text.
///
/// Thread safety: lookups take the read lock, so concurrent extraction on
/// already-compiled patterns never contends. A miss takes the write lock,
/// re-checks, and compiles while holding it, so each distinct text is
/// compiled at most once. Failed compilations are not stored: every later
/// request for the same text retries and observes the same error.
///
/// Keys are not normalized: `%{DAY}` and `(?:%{DAY})` are separate entries
/// even though they denote the same regex.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: RwLock<HashMap<String, Arc<CompiledPattern>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached compilation of `pattern`, or run `compile` and
    /// cache its result.
    pub fn get_or_compile(
        &self,
        pattern: &str,
        compile: impl FnOnce() -> Result<CompiledPattern>,
    ) -> Result<Arc<CompiledPattern>> {
        if let Some(hit) = self.get(pattern) {
            trace!(pattern, "compiled pattern cache hit");
            return Ok(hit);
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have compiled it while we waited for the lock
        if let Some(hit) = entries.get(pattern) {
            return Ok(Arc::clone(hit));
        }
        let compiled = Arc::new(compile()?);
        debug!(pattern, groups = compiled.labels().count(), "compiled pattern");
        entries.insert(pattern.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn get(&self, pattern: &str) -> Option<Arc<CompiledPattern>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pattern)
            .cloned()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.get(pattern).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every compiled pattern. Called when the registry changes.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
