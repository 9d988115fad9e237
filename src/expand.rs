//! Placeholder expansion ("denormalization").
//!
//! Every `%{NAME[:SEMANTIC[:TYPE]]}` is replaced by the already-resolved
//! expression of `NAME`, wrapped in a named group (or a plain group in
//! named-captures-only mode when no semantic is given). Referenced patterns
//! are resolved before their dependents, so expansion never recurses: a
//! lookup returns fully expanded text.

use crate::alias::AliasTable;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::syntax;
use crate::value::{merge_type_info, FieldType, TypeInfo};

/// Result of expanding one expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    pub expression: String,
    pub type_info: TypeInfo,
}

/// Expand every placeholder in `raw` against `registry`.
///
/// Type annotations are recorded under the occurrence's label; the referenced
/// pattern's own annotations are merged after, so the outermost declaration
/// of a label wins.
pub fn denormalize(raw: &str, registry: &Registry, aliases: &AliasTable) -> Result<Expansion> {
    let placeholders = syntax::placeholders(raw)?;
    let mut expression = String::with_capacity(raw.len());
    let mut type_info = TypeInfo::new();
    let mut last = 0;

    for placeholder in &placeholders {
        let definition = registry
            .get(placeholder.name)
            .ok_or_else(|| Error::UnknownPattern(placeholder.name.to_string()))?;

        if let Some(ty) = placeholder.ty.as_ref().filter(|ty| **ty != FieldType::String) {
            type_info
                .entry(placeholder.label().to_string())
                .or_insert_with(|| ty.clone());
        }
        merge_type_info(&mut type_info, &definition.type_info);

        expression.push_str(&raw[last..placeholder.span.start]);
        if registry.named_captures_only() && placeholder.semantic.is_none() {
            expression.push_str("(?:");
        } else {
            expression.push_str("(?P<");
            expression.push_str(&aliases.aliasize(placeholder.label()));
            expression.push('>');
        }
        expression.push_str(&definition.resolved);
        expression.push(')');
        last = placeholder.span.end;
    }
    expression.push_str(&raw[last..]);

    Ok(Expansion {
        expression,
        type_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(named_only: bool, pairs: &[(&str, &str)]) -> (Registry, AliasTable) {
        let aliases = AliasTable::new();
        let mut registry = Registry::new(named_only);
        registry
            .add_batch(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                &aliases,
            )
            .unwrap();
        (registry, aliases)
    }

    #[test]
    fn placeholder_free_expression_is_unchanged() {
        let (reg, aliases) = registry(false, &[]);
        let raw = r"(?:foo|bar)\d{2,3}[%]{1}";
        let out = denormalize(raw, &reg, &aliases).unwrap();
        assert_eq!(out.expression, raw);
        assert!(out.type_info.is_empty());
    }

    #[test]
    fn default_mode_names_every_reference() {
        let (reg, aliases) = registry(false, &[("DAY", "Mon|Tue"), ("NUM", r"\d+")]);
        let out = denormalize("%{DAY} %{NUM:n}", &reg, &aliases).unwrap();
        assert_eq!(out.expression, r"(?P<DAY>Mon|Tue) (?P<n>\d+)");
    }

    #[test]
    fn named_only_mode_leaves_unlabelled_references_unnamed() {
        let (reg, aliases) = registry(true, &[("DAY", "Mon|Tue"), ("NUM", r"\d+")]);
        let out = denormalize("%{DAY} %{NUM:n}", &reg, &aliases).unwrap();
        assert_eq!(out.expression, r"(?:Mon|Tue) (?P<n>\d+)");
    }

    #[test]
    fn nested_references_use_resolved_text() {
        let (reg, aliases) = registry(
            false,
            &[("INT", r"\d+"), ("PAIR", "%{INT:a}-%{INT:b}")],
        );
        let out = denormalize("%{PAIR:p}", &reg, &aliases).unwrap();
        assert_eq!(out.expression, r"(?P<p>(?P<a>\d+)-(?P<b>\d+))");
    }

    #[test]
    fn punctuated_labels_are_aliased() {
        let (reg, aliases) = registry(false, &[("WORD", r"\w+")]);
        let out = denormalize("%{WORD:day-of.week}", &reg, &aliases).unwrap();
        let internal = aliases.aliasize("day-of.week");
        assert_eq!(out.expression, format!(r"(?P<{internal}>\w+)"));
        assert_eq!(aliases.resolve(&internal), "day-of.week");
    }

    #[test]
    fn type_info_is_recorded_and_merged() {
        let (reg, aliases) = registry(
            false,
            &[("NUM", r"\d+"), ("PORT", "%{NUM:port:int}")],
        );
        let out = denormalize(
            "%{PORT} %{NUM:ratio:float} %{NUM:name:string} %{NUM:[a][b]:int}",
            &reg,
            &aliases,
        )
        .unwrap();
        assert_eq!(out.type_info["port"], FieldType::Int);
        assert_eq!(out.type_info["ratio"], FieldType::Float);
        assert_eq!(out.type_info["[a][b]"], FieldType::Int);
        assert!(!out.type_info.contains_key("name"));
    }

    #[test]
    fn outer_declaration_wins_over_inner() {
        let (reg, aliases) = registry(
            false,
            &[("NUM", r"\d+"), ("PORT", "%{NUM:port:int}")],
        );
        let out = denormalize("%{NUM:port:float} %{PORT}", &reg, &aliases).unwrap();
        assert_eq!(out.type_info["port"], FieldType::Float);
    }

    #[test]
    fn unknown_reference_fails() {
        let (reg, aliases) = registry(false, &[]);
        let err = denormalize("%{NOPE:x}", &reg, &aliases).unwrap_err();
        assert_eq!(err.to_string(), "no pattern found for %{NOPE}");
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        let (reg, aliases) = registry(false, &[("D", "x")]);
        let out = denormalize("%{D:d}%{D:d}", &reg, &aliases).unwrap();
        assert_eq!(out.expression, "(?P<d>x)(?P<d>x)");
    }
}
