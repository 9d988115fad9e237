//! A compiled top-level pattern and the extraction operations on it.

use std::collections::{BTreeMap, HashMap, HashSet};

use fancy_regex::{Captures, Regex};

use crate::alias::AliasTable;
use crate::error::{Error, Result};
use crate::expand::Expansion;
use crate::groups::rewrite_named_groups;
use crate::value::{bracket_path, insert_nested, FieldType, TypeInfo, Value};

/// Flat `field -> value` extraction result.
pub type Fields = HashMap<String, String>;

/// `field -> every value captured under it`, in group order.
pub type MultiFields = HashMap<String, Vec<String>>;

/// Typed extraction result; bracket-path labels produce nested maps.
pub type TypedFields = BTreeMap<String, Value>;

/// An expanded, compiled pattern with its capture labels and type map.
#[derive(Debug)]
pub struct CompiledPattern {
    pattern: String,
    expanded: String,
    regex: Regex,
    type_info: TypeInfo,
    /// Logical label per capture group index; `None` for unnamed groups.
    labels: Vec<Option<String>>,
    remove_empty_values: bool,
}

impl CompiledPattern {
    /// Compile an expansion of `pattern` with the host regex engine.
    pub fn new(
        pattern: &str,
        expansion: Expansion,
        aliases: &AliasTable,
        remove_empty_values: bool,
    ) -> Result<Self> {
        let groups = rewrite_named_groups(&expansion.expression, aliases);
        let regex = Regex::new(&groups.expression).map_err(|source| Error::Regex {
            expanded: groups.expression.clone(),
            source: Box::new(source),
        })?;
        let labels = regex
            .capture_names()
            .map(|name| name.map(|name| aliases.resolve(groups.original(name))))
            .collect();

        Ok(Self {
            pattern: pattern.to_string(),
            expanded: groups.expression,
            regex,
            type_info: expansion.type_info,
            labels,
            remove_empty_values,
        })
    }

    /// The pattern text this was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The final expression handed to the regex engine.
    pub fn expanded(&self) -> &str {
        &self.expanded
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// Labels of all named groups, in group order, duplicates included.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().flatten().map(String::as_str)
    }

    pub fn is_match(&self, text: &str) -> Result<bool> {
        self.regex
            .is_match(text)
            .map_err(|e| Error::Match(Box::new(e)))
    }

    fn captures<'t>(&self, text: &'t str) -> Result<Option<Captures<'t>>> {
        self.regex
            .captures(text)
            .map_err(|e| Error::Match(Box::new(e)))
    }

    /// Labelled groups of the first match, left to right. A group that did
    /// not take part in the match yields `None`.
    fn labelled<'s, 't>(
        &'s self,
        caps: &'s Captures<'t>,
    ) -> impl Iterator<Item = (&'s str, Option<&'t str>)> + 's {
        self.labels.iter().enumerate().filter_map(move |(i, label)| {
            let label = label.as_deref().filter(|l| !l.is_empty())?;
            Some((label, caps.get(i).map(|m| m.as_str())))
        })
    }

    fn skip_empty(&self, value: &str) -> bool {
        self.remove_empty_values && value.is_empty()
    }

    /// Captured text per label from the first match. Later groups overwrite
    /// earlier ones with the same label, except that a group which did not
    /// participate never replaces an existing value.
    pub fn parse(&self, text: &str) -> Result<Fields> {
        let mut fields = Fields::new();
        let Some(caps) = self.captures(text)? else {
            return Ok(fields);
        };
        for (label, value) in self.labelled(&caps) {
            let value = match value {
                Some(v) => v,
                None if fields.contains_key(label) => continue,
                None => "",
            };
            if self.skip_empty(value) {
                continue;
            }
            fields.insert(label.to_string(), value.to_string());
        }
        Ok(fields)
    }

    /// Like [`parse`](Self::parse), but keeps every value of a repeated label.
    pub fn parse_to_multi_map(&self, text: &str) -> Result<MultiFields> {
        let mut fields = MultiFields::new();
        let Some(caps) = self.captures(text)? else {
            return Ok(fields);
        };
        for (label, value) in self.labelled(&caps) {
            let value = value.unwrap_or_default();
            if self.skip_empty(value) {
                continue;
            }
            fields
                .entry(label.to_string())
                .or_default()
                .push(value.to_string());
        }
        Ok(fields)
    }

    /// Captures converted to their declared types; bracket-path labels such
    /// as `[server][port]` are stored as nested maps.
    pub fn parse_typed(&self, text: &str) -> Result<TypedFields> {
        let mut fields = TypedFields::new();
        let Some(caps) = self.captures(text)? else {
            self.check_types()?;
            return Ok(fields);
        };
        let mut seen: HashSet<&str> = HashSet::new();
        for (label, value) in self.labelled(&caps) {
            let participated = value.is_some();
            let value = value.unwrap_or_default();
            if (!participated && seen.contains(label)) || self.skip_empty(value) {
                continue;
            }
            let ty = self.type_info.get(label);
            if value.is_empty() && matches!(ty, Some(FieldType::Int | FieldType::Float)) {
                continue;
            }
            let converted = Value::convert(label, value, ty)?;
            match bracket_path(label) {
                Some(path) => insert_nested(&mut fields, &path, converted)?,
                None => {
                    fields.insert(label.to_string(), converted);
                }
            }
            seen.insert(label);
        }
        Ok(fields)
    }

    /// Fail on the first declared type that cannot be converted, in label
    /// order.
    fn check_types(&self) -> Result<()> {
        let unsupported = self
            .type_info
            .iter()
            .filter(|(_, ty)| !ty.is_supported())
            .min_by(|a, b| a.0.cmp(b.0));
        match unsupported {
            Some((field, ty)) => Err(Error::UnsupportedType {
                field: field.clone(),
                value: None,
                ty: ty.name().to_string(),
            }),
            None => Ok(()),
        }
    }
}
