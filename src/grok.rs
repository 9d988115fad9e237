//! The grok engine: a pattern registry, an alias table and a compiled-pattern
//! cache behind one thread-safe handle.
//!
//! Lock order is cache, then registry, then aliases. Adding patterns takes
//! the registry write lock, releases it, and only then clears the cache, so
//! an add never holds the registry while waiting on the cache.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Context;
use tracing::debug;

use crate::alias::AliasTable;
use crate::cache::PatternCache;
use crate::compiled::{CompiledPattern, Fields, MultiFields, TypedFields};
use crate::config::Config;
use crate::error::Result;
use crate::expand;
use crate::fs::load_pattern_source;
use crate::pattern_db::default_patterns;
use crate::registry::{PatternDefinition, Registry};

#[derive(Debug)]
pub struct Grok {
    config: Config,
    registry: RwLock<Registry>,
    aliases: AliasTable,
    cache: PatternCache,
}

impl Grok {
    /// An engine with the default configuration and the built-in patterns.
    pub fn new() -> Result<Self> {
        Self::seeded(Config::default())
    }

    /// Build an engine from `config`: built-in patterns (unless skipped),
    /// then each pattern source in order, then the inline patterns. Any
    /// failing step fails construction.
    pub fn with_config(config: &Config) -> anyhow::Result<Self> {
        let grok = Self::seeded(config.clone()).context("failed to load built-in patterns")?;

        for source in &config.pattern_sources {
            grok.add_patterns_from_path(source)?;
        }
        if !config.patterns.is_empty() {
            grok.add_patterns(config.patterns.clone())
                .context("failed to add configured patterns")?;
        }
        Ok(grok)
    }

    fn seeded(config: Config) -> Result<Self> {
        let grok = Self {
            registry: RwLock::new(Registry::new(config.named_captures_only)),
            aliases: AliasTable::new(),
            cache: PatternCache::new(),
            config,
        };
        if !grok.config.skip_default_patterns {
            grok.add_patterns(default_patterns())?;
        }
        Ok(grok)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Add a single named pattern.
    pub fn add_pattern(&self, name: &str, expression: &str) -> Result<()> {
        self.add_patterns([(name, expression)]).map(|_| ())
    }

    /// Add a batch of named patterns, resolved in dependency order.
    ///
    /// Within a batch a later duplicate name wins. Returns the number of
    /// definitions resolved, which is the whole registry when the batch
    /// redefines an existing name.
    pub fn add_patterns<I, K, V>(&self, patterns: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let batch: BTreeMap<String, String> = patterns
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if batch.is_empty() {
            return Ok(0);
        }

        let added = {
            let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
            registry.add_batch(batch, &self.aliases)?
        };
        self.cache.clear();
        Ok(added)
    }

    /// Load every pattern file a source names (file, directory or glob) as
    /// one batch.
    pub fn add_patterns_from_path(&self, source: &Path) -> anyhow::Result<usize> {
        let patterns = load_pattern_source(source)?;
        let added = self
            .add_patterns(patterns)
            .with_context(|| format!("failed to add patterns from {}", source.display()))?;
        debug!(source = %source.display(), added, "loaded pattern source");
        Ok(added)
    }

    /// Known pattern names, sorted.
    pub fn pattern_names(&self) -> Vec<String> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn definition(&self, name: &str) -> Option<PatternDefinition> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Number of compiled patterns currently cached.
    pub fn cached_patterns(&self) -> usize {
        self.cache.len()
    }

    /// Expand and compile `pattern`, or return the cached compilation.
    pub fn compile(&self, pattern: &str) -> Result<Arc<CompiledPattern>> {
        self.cache.get_or_compile(pattern, || {
            let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
            let expansion = expand::denormalize(pattern, &registry, &self.aliases)?;
            CompiledPattern::new(
                pattern,
                expansion,
                &self.aliases,
                self.config.remove_empty_values,
            )
        })
    }

    pub fn matches(&self, pattern: &str, text: &str) -> Result<bool> {
        self.compile(pattern)?.is_match(text)
    }

    pub fn parse(&self, pattern: &str, text: &str) -> Result<Fields> {
        self.compile(pattern)?.parse(text)
    }

    pub fn parse_to_multi_map(&self, pattern: &str, text: &str) -> Result<MultiFields> {
        self.compile(pattern)?.parse_to_multi_map(text)
    }

    pub fn parse_typed(&self, pattern: &str, text: &str) -> Result<TypedFields> {
        self.compile(pattern)?.parse_typed(text)
    }

    /// Parse every line of `reader` with `pattern` and hand each result to
    /// `sink`, including empty maps for lines that do not match. Stops at
    /// the first read, extraction or sink error.
    pub fn parse_stream<R, F>(&self, reader: R, pattern: &str, mut sink: F) -> anyhow::Result<()>
    where
        R: BufRead,
        F: FnMut(Fields) -> anyhow::Result<()>,
    {
        let compiled = self.compile(pattern)?;
        for (idx, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
            let fields = compiled
                .parse(&line)
                .with_context(|| format!("line {}", idx + 1))?;
            sink(fields)?;
        }
        Ok(())
    }
}
