//! Named capture-group rewriting for the host regex engine.
//!
//! Expanded grok patterns routinely repeat a group name (`%{DAY:day}
//! %{DAY:day}`, or `INT` nested under several fields), which the host engine
//! rejects. Before compiling, every named group is visited left to right:
//! labels that are not engine identifiers are aliased (this covers native
//! `(?<day-of.week>...)` groups written directly in a pattern), and the
//! second and later uses of a name get a unique suffix. Named backreferences
//! are rewritten to match. The rename map lets the extractor translate group
//! names back to logical labels.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use crate::alias::AliasTable;

/// An expression whose named groups are unique engine identifiers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewrittenGroups {
    pub expression: String,
    /// Unique group name -> name it was derived from.
    pub renamed: HashMap<String, String>,
}

impl RewrittenGroups {
    /// Name a group had before it was made unique.
    pub fn original<'a>(&'a self, name: &'a str) -> &'a str {
        self.renamed.get(name).map_or(name, String::as_str)
    }
}

/// Where a group name appears in an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupName {
    /// `(?P<name>` or `(?<name>`.
    Definition(Range<usize>),
    /// `\k<name>` or `(?P=name)`.
    Reference(Range<usize>),
}

/// Byte ranges of every named group and named backreference in `expr`,
/// left to right.
///
/// Other escapes and character classes are skipped, as are look-behind
/// openers `(?<=` and `(?<!`.
pub fn scan_group_names(expr: &str) -> Vec<GroupName> {
    let bytes = expr.as_bytes();
    let mut names = Vec::new();
    let mut class_depth = 0usize;
    let mut i = 0;

    // Range from `start` up to the next `close`, if there is one.
    let until = |start: usize, close: u8| {
        bytes[start..]
            .iter()
            .position(|&b| b == close)
            .map(|len| start..start + len)
    };

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                if class_depth == 0 && bytes[i + 1..].starts_with(b"k<") {
                    if let Some(span) = until(i + 3, b'>') {
                        i = span.end + 1;
                        names.push(GroupName::Reference(span));
                        continue;
                    }
                }
                i += 2;
                continue;
            }
            b'[' if class_depth == 0 => {
                class_depth = 1;
                i += 1;
                // `[^]...]` and `[]...]` start with a literal `]`
                if bytes.get(i) == Some(&b'^') {
                    i += 1;
                }
                if bytes.get(i) == Some(&b']') {
                    i += 1;
                }
                continue;
            }
            b'[' => class_depth += 1,
            b']' if class_depth > 0 => class_depth -= 1,
            b'(' if class_depth == 0 => {
                let rest = &bytes[i + 1..];
                if rest.starts_with(b"?P=") {
                    if let Some(span) = until(i + 4, b')') {
                        i = span.end + 1;
                        names.push(GroupName::Reference(span));
                        continue;
                    }
                }
                let prefix = if rest.starts_with(b"?P<") {
                    3
                } else if rest.starts_with(b"?<") && !matches!(rest.get(2), Some(b'=' | b'!')) {
                    2
                } else {
                    0
                };
                if prefix > 0 {
                    if let Some(span) = until(i + 1 + prefix, b'>') {
                        i = span.end + 1;
                        names.push(GroupName::Definition(span));
                        continue;
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    names
}

/// `\k<1>`, `\k<-1>` and `\k<+1>` refer to groups by number.
fn is_numeric_reference(name: &str) -> bool {
    let digits = name.strip_prefix(['-', '+']).unwrap_or(name);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Alias and de-duplicate every named group in `expr`.
///
/// A named backreference is rewritten to the unique name of the closest
/// preceding group with its label, so `(?<w>.)(?<w>.)\k<w>` still refers to
/// the second group after it becomes `w__2`.
pub fn rewrite_named_groups(expr: &str, aliases: &AliasTable) -> RewrittenGroups {
    let names = scan_group_names(expr);
    if names.is_empty() {
        return RewrittenGroups {
            expression: expr.to_string(),
            renamed: HashMap::new(),
        };
    }

    let mut used: HashSet<String> = names
        .iter()
        .filter_map(|name| match name {
            GroupName::Definition(span) => Some(aliases.aliasize(&expr[span.clone()])),
            GroupName::Reference(_) => None,
        })
        .collect();
    let mut seen: HashSet<String> = HashSet::new();
    // aliased label -> name of the latest group carrying it
    let mut latest: HashMap<String, String> = HashMap::new();
    let mut renamed = HashMap::new();
    let mut expression = String::with_capacity(expr.len() + names.len() * 4);
    let mut last = 0;

    for name in &names {
        match name {
            GroupName::Definition(span) => {
                expression.push_str(&expr[last..span.start]);
                let base = aliases.aliasize(&expr[span.clone()]);
                let unique = if seen.insert(base.clone()) {
                    base.clone()
                } else {
                    let mut n = 2;
                    let unique = loop {
                        let candidate = format!("{base}__{n}");
                        if used.insert(candidate.clone()) {
                            break candidate;
                        }
                        n += 1;
                    };
                    renamed.insert(unique.clone(), base.clone());
                    unique
                };
                expression.push_str(&unique);
                latest.insert(base, unique);
                last = span.end;
            }
            GroupName::Reference(span) => {
                let label = &expr[span.clone()];
                if is_numeric_reference(label) {
                    continue;
                }
                expression.push_str(&expr[last..span.start]);
                let base = aliases.aliasize(label);
                expression.push_str(latest.get(&base).unwrap_or(&base));
                last = span.end;
            }
        }
    }
    expression.push_str(&expr[last..]);

    RewrittenGroups {
        expression,
        renamed,
    }
}
