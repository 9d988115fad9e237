//! Placeholder lexing and validation.
//!
//! A placeholder is `%{NAME}`, `%{NAME:SEMANTIC}` or `%{NAME:SEMANTIC:TYPE}`:
//!
//! - `NAME` is a word, optionally chained with `-` or `.` (`TIMESTAMP-ISO8601`)
//! - `SEMANTIC` is either a flat token of word characters, `.`, `-`, `(` and
//!   `)` (`cs(User-Agent)`), or a bracket path (`[a][b][c]`)
//! - `TYPE` is a word; `string`, `int` and `float` are the convertible ones
//!
//! Every placeholder is checked before expansion so a malformed macro never
//! ends up as a broken regex fragment.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::value::FieldType;

/// Any `%{...}` occurrence. The payload is validated separately so that bad
/// payloads are reported instead of silently left in the expression.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\{([^{}]*)\}").expect("placeholder regex is valid"));

/// A validated placeholder reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// The full `%{...}` text as it appears in the expression.
    pub text: &'a str,
    /// Byte range of `text` within the scanned expression.
    pub span: Range<usize>,
    pub name: &'a str,
    pub semantic: Option<&'a str>,
    pub ty: Option<FieldType>,
}

impl<'a> Placeholder<'a> {
    /// The label this occurrence captures under: the semantic alias if given,
    /// the pattern name otherwise.
    pub fn label(&self) -> &'a str {
        self.semantic.unwrap_or(self.name)
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_word_byte)
}

/// `\w+` chained with `-` or `.` separators.
fn is_pattern_name(s: &str) -> bool {
    s.split(['-', '.']).all(is_word)
}

fn is_flat_semantic(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| is_word_byte(b) || matches!(b, b'.' | b'(' | b')' | b'-'))
}

/// One or more `[word]` segments, nothing else.
pub fn is_bracket_path(s: &str) -> bool {
    let mut rest = s;
    if rest.is_empty() {
        return false;
    }
    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return false;
        };
        let Some(close) = inner.find(']') else {
            return false;
        };
        if !is_word(&inner[..close]) {
            return false;
        }
        rest = &inner[close + 1..];
    }
    true
}

/// Split a payload such as `NUMBER:[server][port]:int` into its parts.
///
/// `text` is the full placeholder text used in error messages and for
/// textual replacement.
pub fn parse_placeholder<'a>(text: &'a str, payload: &'a str) -> Result<Placeholder<'a>> {
    let invalid = || Error::InvalidPlaceholder(payload.to_string());
    let mut parts = payload.split(':');
    let name = parts.next().ok_or_else(invalid)?;
    let semantic = parts.next();
    let ty = parts.next();
    if parts.next().is_some() || !is_pattern_name(name) {
        return Err(invalid());
    }
    if semantic.is_some_and(|s| !is_flat_semantic(s) && !is_bracket_path(s)) {
        return Err(invalid());
    }
    let ty = match ty {
        Some(ty) if is_word(ty) => Some(FieldType::from_name(ty)),
        Some(_) => return Err(invalid()),
        None => None,
    };
    Ok(Placeholder {
        text,
        span: 0..text.len(),
        name,
        semantic,
        ty,
    })
}

/// Validate a bare payload (the text between `%{` and `}`).
pub fn validate(payload: &str) -> Result<()> {
    parse_placeholder(payload, payload).map(|_| ())
}

/// All placeholders of `expr`, left to right, validated.
pub fn placeholders(expr: &str) -> Result<Vec<Placeholder<'_>>> {
    PLACEHOLDER
        .captures_iter(expr)
        .map(|caps| {
            let span = caps.get(0).map_or(0..0, |m| m.range());
            let (whole, [payload]) = caps.extract();
            let mut placeholder = parse_placeholder(whole, payload)?;
            placeholder.span = span;
            Ok(placeholder)
        })
        .collect()
}

/// Distinct pattern names referenced by `expr`, in order of first use.
pub fn references(expr: &str) -> Result<Vec<&str>> {
    let mut names: Vec<&str> = Vec::new();
    for placeholder in placeholders(expr)? {
        if !names.contains(&placeholder.name) {
            names.push(placeholder.name);
        }
    }
    Ok(names)
}
