//! Typed field values and the nested-field builder.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use crate::error::{Error, NumberError, Result};
use crate::syntax::is_bracket_path;

/// Declared type of a captured field (`%{NUMBER:n:int}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Int,
    Float,
    /// A word the lexer accepted but no conversion exists for.
    Other(String),
}

impl FieldType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "string" => FieldType::String,
            "int" => FieldType::Int,
            "float" => FieldType::Float,
            other => FieldType::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Other(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FieldType::Other(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field label → declared type. `string` is never recorded.
pub type TypeInfo = HashMap<String, FieldType>;

/// Merge `from` into `into`; entries already in `into` win.
pub fn merge_type_info(into: &mut TypeInfo, from: &TypeInfo) {
    for (field, ty) in from {
        into.entry(field.clone()).or_insert_with(|| ty.clone());
    }
}

/// A parsed field: text, a converted number, or a nested object built from a
/// bracket path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Convert a captured substring according to its declared type.
    ///
    /// `int` goes through `f64` and truncates, so `"5.75"` becomes `5`.
    /// Non-finite values (`inf`, `NaN`) are rejected for both numeric types,
    /// as are `int` values outside the `i64` range.
    pub fn convert(field: &str, raw: &str, ty: Option<&FieldType>) -> Result<Value> {
        let invalid = |ty, reason| Error::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
            ty,
            reason,
        };
        let parse_f64 = |ty: &'static str| {
            let n = raw
                .trim()
                .parse::<f64>()
                .map_err(|source| invalid(ty, NumberError::Parse(source)))?;
            if n.is_finite() {
                Ok(n)
            } else {
                Err(invalid(ty, NumberError::NotFinite))
            }
        };
        match ty {
            None | Some(FieldType::String) => Ok(Value::String(raw.to_string())),
            Some(FieldType::Int) => {
                let n = parse_f64("int")?.trunc();
                // i64::MAX as f64 rounds up to 2^63, which is already out of range
                if n < i64::MIN as f64 || n >= i64::MAX as f64 {
                    return Err(invalid("int", NumberError::OutOfRange));
                }
                Ok(Value::Int(n as i64))
            }
            Some(FieldType::Float) => Ok(Value::Float(parse_f64("float")?)),
            Some(FieldType::Other(name)) => Err(Error::UnsupportedType {
                field: field.to_string(),
                value: Some(raw.to_string()),
                ty: name.clone(),
            }),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

/// Segments of a `[a][b][c]` label, or `None` for a flat label.
pub fn bracket_path(label: &str) -> Option<Vec<&str>> {
    if !is_bracket_path(label) {
        return None;
    }
    Some(
        label
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split("][")
            .collect(),
    )
}

/// Store `value` at `path` below `root`, creating intermediate maps.
///
/// Intermediate keys must be absent or already hold a map.
pub fn insert_nested(root: &mut BTreeMap<String, Value>, path: &[&str], value: Value) -> Result<()> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(());
    };
    if rest.is_empty() {
        root.insert((*first).to_string(), value);
        return Ok(());
    }
    let child = root
        .entry((*first).to_string())
        .or_insert_with(|| Value::Map(BTreeMap::new()));
    match child {
        Value::Map(map) => insert_nested(map, rest, value),
        _ => Err(Error::NestedFieldCollision((*first).to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_names_roundtrip() {
        for name in ["string", "int", "float", "bool"] {
            assert_eq!(FieldType::from_name(name).name(), name);
        }
        assert!(!FieldType::from_name("bool").is_supported());
        assert!(FieldType::Int.is_supported());
    }

    #[test]
    fn int_truncates_through_float() {
        assert_eq!(
            Value::convert("n", "5.75", Some(&FieldType::Int)).unwrap(),
            Value::Int(5)
        );
        assert_eq!(
            Value::convert("n", "-5.75", Some(&FieldType::Int)).unwrap(),
            Value::Int(-5)
        );
        assert_eq!(
            Value::convert("n", "8080", Some(&FieldType::Int)).unwrap(),
            Value::Int(8080)
        );
    }

    #[test]
    fn float_and_string_conversion() {
        assert_eq!(
            Value::convert("n", "123.45", Some(&FieldType::Float)).unwrap(),
            Value::Float(123.45)
        );
        assert_eq!(
            Value::convert("n", "abc", None).unwrap(),
            Value::String("abc".into())
        );
        assert_eq!(
            Value::convert("n", "abc", Some(&FieldType::String)).unwrap(),
            Value::String("abc".into())
        );
    }

    #[test]
    fn unparseable_number_is_an_error() {
        let err = Value::convert("port", "abc", Some(&FieldType::Int)).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { ty: "int", .. }));
        assert_eq!(err.to_string(), "field port: \"abc\" is not a valid int");
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for raw in ["inf", "-inf", "NaN", "infinity"] {
            for ty in [FieldType::Int, FieldType::Float] {
                let err = Value::convert("n", raw, Some(&ty)).unwrap_err();
                assert!(
                    matches!(err, Error::InvalidNumber { reason: NumberError::NotFinite, .. }),
                    "{raw} as {ty:?}: {err:?}"
                );
            }
        }
    }

    #[test]
    fn int_outside_i64_range_is_rejected() {
        for raw in ["99999999999999999999999", "-99999999999999999999999", "9223372036854775808"] {
            let err = Value::convert("n", raw, Some(&FieldType::Int)).unwrap_err();
            assert!(matches!(err, Error::InvalidNumber { ty: "int", reason: NumberError::OutOfRange, .. }));
        }
        assert_eq!(
            Value::convert("n", "-9223372036854775808", Some(&FieldType::Int)).unwrap(),
            Value::Int(i64::MIN)
        );
        // still a valid float
        assert_eq!(
            Value::convert("n", "1e20", Some(&FieldType::Float)).unwrap(),
            Value::Float(1e20)
        );
    }

    #[test]
    fn unsupported_type_names_value_and_type() {
        let ty = FieldType::from_name("unknown");
        let err = Value::convert("n", "5", Some(&ty)).unwrap_err();
        assert_eq!(err.to_string(), "field n: cannot convert \"5\" to unknown");
    }

    #[test]
    fn bracket_path_segments() {
        assert_eq!(bracket_path("[a][b][c]"), Some(vec!["a", "b", "c"]));
        assert_eq!(bracket_path("[a]"), Some(vec!["a"]));
        assert_eq!(bracket_path("a"), None);
        assert_eq!(bracket_path("a[b]"), None);
    }

    #[test]
    fn nested_insert_builds_maps() {
        let mut root = BTreeMap::new();
        insert_nested(&mut root, &["a", "b"], "hi".into()).unwrap();
        insert_nested(&mut root, &["a", "c"], Value::Int(1)).unwrap();
        insert_nested(&mut root, &["top"], Value::Float(0.5)).unwrap();

        let a = root["a"].as_map().unwrap();
        assert_eq!(a["b"], Value::String("hi".into()));
        assert_eq!(a["c"], Value::Int(1));
        assert_eq!(root["top"], Value::Float(0.5));
    }

    #[test]
    fn nested_insert_under_scalar_fails() {
        let mut root = BTreeMap::new();
        root.insert("a".to_string(), Value::from("flat"));
        let err = insert_nested(&mut root, &["a", "b"], "x".into()).unwrap_err();
        assert!(matches!(err, Error::NestedFieldCollision(ref k) if k == "a"));
    }

    #[test]
    fn last_segment_overwrites() {
        let mut root = BTreeMap::new();
        insert_nested(&mut root, &["a", "b"], "one".into()).unwrap();
        insert_nested(&mut root, &["a", "b"], "two".into()).unwrap();
        assert_eq!(root["a"].as_map().unwrap()["b"].as_str(), Some("two"));
    }

    #[test]
    fn serializes_untagged() {
        let mut root = BTreeMap::new();
        insert_nested(&mut root, &["server", "port"], Value::Int(8080)).unwrap();
        insert_nested(&mut root, &["stats", "count"], Value::Float(123.45)).unwrap();
        let json = serde_json::to_string(&root).unwrap();
        assert_eq!(json, r#"{"server":{"port":8080},"stats":{"count":123.45}}"#);
    }

    #[test]
    fn merge_keeps_first_writer() {
        let mut into = TypeInfo::new();
        into.insert("n".into(), FieldType::Int);
        let mut from = TypeInfo::new();
        from.insert("n".into(), FieldType::Float);
        from.insert("m".into(), FieldType::Float);
        merge_type_info(&mut into, &from);
        assert_eq!(into["n"], FieldType::Int);
        assert_eq!(into["m"], FieldType::Float);
    }
}
