//! Dependency ordering for a batch of pattern definitions.
//!
//! Each definition in the batch depends on every other batch member it
//! references. Names that are already resolved in the registry are treated as
//! leaves. The batch is ordered with Kahn's algorithm; ties are broken by name
//! so errors and insertion order are deterministic.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::syntax;

/// Order `batch` so that every definition comes after the batch members it
/// references.
///
/// Fails on malformed placeholders, on references that are neither in the
/// batch nor `is_known`, and on cycles. Nothing is mutated, so a failing
/// batch can be rejected as a whole.
pub fn resolve_order(
    batch: &BTreeMap<String, String>,
    is_known: impl Fn(&str) -> bool,
) -> Result<Vec<String>> {
    // name -> batch members it waits for
    let mut waiting: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    // name -> batch members waiting for it
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for (name, raw) in batch {
        let mut deps = BTreeSet::new();
        for reference in syntax::references(raw)? {
            if let Some((key, _)) = batch.get_key_value(reference) {
                deps.insert(key.as_str());
                dependents.entry(key.as_str()).or_default().push(name.as_str());
            } else if !is_known(reference) {
                return Err(Error::UnknownPattern(reference.to_string()));
            }
        }
        waiting.insert(name.as_str(), deps);
    }

    let mut ready: BTreeSet<&str> = waiting
        .iter()
        .filter(|(_, deps)| deps.is_empty())
        .map(|(name, _)| *name)
        .collect();
    let mut order = Vec::with_capacity(batch.len());

    while let Some(name) = ready.pop_first() {
        waiting.remove(name);
        order.push(name.to_string());
        for dependent in dependents.get(name).into_iter().flatten() {
            if let Some(deps) = waiting.get_mut(dependent) {
                deps.remove(name);
                if deps.is_empty() {
                    ready.insert(*dependent);
                }
            }
        }
    }

    if !waiting.is_empty() {
        return Err(Error::CyclicDependency(
            waiting.keys().map(|name| name.to_string()).collect(),
        ));
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn position(order: &[String], name: &str) -> usize {
        order.iter().position(|n| n == name).unwrap()
    }

    #[test]
    fn dependencies_come_first() {
        let b = batch(&[
            ("IRCMSG", "%{IRCUSER:user} .* : %{IRCBODY:message}"),
            ("IRCUSER", r"\A@(\w+)"),
            ("IRCBODY", ".*"),
        ]);
        let order = resolve_order(&b, |_| false).unwrap();
        assert_eq!(order.len(), 3);
        assert!(position(&order, "IRCUSER") < position(&order, "IRCMSG"));
        assert!(position(&order, "IRCBODY") < position(&order, "IRCMSG"));
    }

    #[test]
    fn independent_names_are_ordered_by_name() {
        let b = batch(&[("B", "b"), ("A", "a"), ("C", "c")]);
        assert_eq!(resolve_order(&b, |_| false).unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn known_names_impose_no_ordering() {
        let b = batch(&[("GREETING", "%{WORD} %{WORD:who}")]);
        let order = resolve_order(&b, |name| name == "WORD").unwrap();
        assert_eq!(order, vec!["GREETING"]);
    }

    #[test]
    fn unknown_reference_is_reported() {
        let b = batch(&[("A", "%{B}"), ("B", "%{MISSING:x}")]);
        let err = resolve_order(&b, |_| false).unwrap_err();
        assert!(matches!(err, Error::UnknownPattern(ref n) if n == "MISSING"));
    }

    #[test]
    fn cycles_are_reported_with_members() {
        let b = batch(&[("A", "%{B}"), ("B", "%{C}"), ("C", "%{A}"), ("D", "d")]);
        let err = resolve_order(&b, |_| true).unwrap_err();
        match err {
            Error::CyclicDependency(names) => assert_eq!(names, vec!["A", "B", "C"]),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let b = batch(&[("A", "x%{A}")]);
        assert!(matches!(
            resolve_order(&b, |_| true),
            Err(Error::CyclicDependency(_))
        ));
    }

    #[test]
    fn batch_member_shadows_known_name() {
        // WORD is both known and redefined in the batch: the batch copy must
        // be resolved first.
        let b = batch(&[("AAA", "%{WORD}"), ("WORD", r"\w+")]);
        let order = resolve_order(&b, |_| true).unwrap();
        assert_eq!(order, vec!["WORD", "AAA"]);
    }

    #[test]
    fn invalid_placeholder_fails_before_ordering() {
        let b = batch(&[("A", "%{B:bad name}"), ("B", "b")]);
        assert!(matches!(
            resolve_order(&b, |_| false),
            Err(Error::InvalidPlaceholder(_))
        ));
    }
}
