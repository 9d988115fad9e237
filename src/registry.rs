//! Named pattern definitions and their resolved forms.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::alias::AliasTable;
use crate::error::Result;
use crate::expand;
use crate::resolver;
use crate::value::TypeInfo;

/// A named pattern: its source text and fully expanded regex.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternDefinition {
    pub name: String,
    pub raw: String,
    /// Placeholder-free expression, ready to embed in a dependent pattern.
    pub resolved: String,
    pub type_info: TypeInfo,
}

/// All patterns known to one engine.
///
/// `raw` keeps every definition's source text so the registry can be rebuilt
/// when a name is redefined; `definitions` holds only resolved entries.
#[derive(Debug, Clone)]
pub struct Registry {
    named_captures_only: bool,
    raw: BTreeMap<String, String>,
    definitions: HashMap<String, PatternDefinition>,
}

impl Registry {
    pub fn new(named_captures_only: bool) -> Self {
        Self {
            named_captures_only,
            raw: BTreeMap::new(),
            definitions: HashMap::new(),
        }
    }

    pub fn named_captures_only(&self) -> bool {
        self.named_captures_only
    }

    pub fn get(&self, name: &str) -> Option<&PatternDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Pattern names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.raw.keys().map(String::as_str).collect()
    }

    /// Add a batch of `name -> raw expression` definitions.
    ///
    /// A batch that only introduces new names is resolved against the current
    /// definitions. A batch that redefines an existing name triggers a rebuild
    /// of every definition from raw text, so dependents pick up the new base
    /// pattern; the rebuild replaces the registry only if it fully succeeds.
    ///
    /// Returns the number of definitions resolved.
    pub fn add_batch(
        &mut self,
        batch: BTreeMap<String, String>,
        aliases: &AliasTable,
    ) -> Result<usize> {
        let redefines = batch.keys().any(|name| self.raw.contains_key(name));
        if !redefines {
            return self.resolve_batch(batch, aliases);
        }

        let mut merged = self.raw.clone();
        merged.extend(batch);
        debug!(patterns = merged.len(), "rebuilding pattern registry");
        let mut rebuilt = Registry::new(self.named_captures_only);
        let count = rebuilt.resolve_batch(merged, aliases)?;
        *self = rebuilt;
        Ok(count)
    }

    /// Resolve `batch` in dependency order, committing each definition as
    /// soon as it is expanded.
    fn resolve_batch(
        &mut self,
        mut batch: BTreeMap<String, String>,
        aliases: &AliasTable,
    ) -> Result<usize> {
        let order = resolver::resolve_order(&batch, |name| self.contains(name))?;
        for name in &order {
            let Some(raw) = batch.remove(name) else {
                continue;
            };
            let expansion = expand::denormalize(&raw, self, aliases)?;
            self.definitions.insert(
                name.clone(),
                PatternDefinition {
                    name: name.clone(),
                    raw: raw.clone(),
                    resolved: expansion.expression,
                    type_info: expansion.type_info,
                },
            );
            self.raw.insert(name.clone(), raw);
        }
        debug!(added = order.len(), total = self.len(), "resolved pattern batch");
        Ok(order.len())
    }
}
