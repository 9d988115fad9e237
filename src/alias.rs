//! Capture-group label aliasing.
//!
//! The host regex engine only accepts `[A-Za-z_][A-Za-z0-9_]*` as group
//! names, while grok labels may contain dots, dashes, parentheses or bracket
//! paths (`day-of.week`, `[server][port]`). Such labels are stored under a
//! digest-derived identifier and resolved back when results are built.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use sha2::{Digest, Sha256};

/// Append-only internal name → original label table.
#[derive(Debug, Default)]
pub struct AliasTable {
    entries: RwLock<HashMap<String, String>>,
}

/// Whether `label` can be used verbatim as a capture-group name.
pub fn is_identifier(label: &str) -> bool {
    let mut bytes = label.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Deterministic identifier for a label: `g` followed by 24 hex digits.
fn digest_name(label: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"grokrs-alias:");
    hasher.update(label.as_bytes());
    let hash = hasher.finalize();
    format!("g{}", &format!("{:x}", hash)[..24])
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine-safe group name for `label`, recording the mapping if one was
    /// needed. Calling this again with the same label returns the same name.
    pub fn aliasize(&self, label: &str) -> String {
        if is_identifier(label) {
            return label.to_string();
        }
        let internal = digest_name(label);
        let known = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&internal);
        if !known {
            self.entries
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(internal.clone())
                .or_insert_with(|| label.to_string());
        }
        internal
    }

    /// Original label for `internal`, or `internal` itself if it was never
    /// aliased.
    pub fn resolve(&self, internal: &str) -> String {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(internal)
            .cloned()
            .unwrap_or_else(|| internal.to_string())
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
}
