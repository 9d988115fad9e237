use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default config file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "grokrs.yml";

/// Engine configuration, fixed once an engine is built.
///
/// ```yaml
/// named-captures-only: true
/// remove-empty-values: true
/// pattern-sources:
///   - patterns/
///   - extra/*.grok
/// patterns:
///   NGINXUSER: "%{IPORHOST:clientip} %{USER:ident}"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Only placeholders with an explicit semantic become capture groups.
    pub named_captures_only: bool,
    /// Do not seed the registry with the built-in table.
    pub skip_default_patterns: bool,
    /// Omit empty captures from extraction results.
    pub remove_empty_values: bool,
    /// Pattern files, directories or globs, loaded in order.
    pub pattern_sources: Vec<PathBuf>,
    /// Inline definitions, added after every pattern source.
    pub patterns: BTreeMap<String, String>,
}

impl Config {
    fn resolve_relative_to(mut self, dir: &Path) -> Self {
        for source in &mut self.pattern_sources {
            if source.is_relative() {
                *source = dir.join(&*source);
            }
        }
        self
    }
}

/// Load config from the given path, or look for `grokrs.yml` in the
/// current directory. Returns the default config if the file doesn't exist.
///
/// Relative `pattern-sources` are resolved against the config file's
/// directory.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => Path::new(DEFAULT_CONFIG_FILE).to_path_buf(),
    };

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config {}", config_path.display()))?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yml::from_str(&contents)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;

    let base = config_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok(config.resolve_relative_to(base))
}
