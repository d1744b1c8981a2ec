//! Skill alias expansion.
//!
//! The alias table is deliberately small: each group lists spellings that are
//! considered the same skill. Members are written in display form and
//! normalized on lookup.

use std::collections::BTreeSet;

use crate::nlp::normalize::{contains_phrase, normalize, tokens};

const ALIAS_GROUPS: &[&[&str]] = &[
    &["postgres", "postgresql"],
    &["k8s", "kubernetes"],
    &["go", "golang"],
    &["js", "javascript"],
    &["ts", "typescript"],
    &["rest", "rest api"],
    &["cicd", "ci cd", "ci/cd"],
];

/// Normalized members of the alias group containing `normalized`, if any.
fn alias_group(normalized: &str) -> Option<Vec<String>> {
    ALIAS_GROUPS.iter().find_map(|group| {
        let members: Vec<String> = group.iter().map(|m| normalize(m)).collect();
        members.iter().any(|m| m == normalized).then_some(members)
    })
}

/// All normalized spellings considered equivalent to `skill`.
///
/// Always contains `normalize(skill)` unless that is empty, in which case the
/// set is empty. Multi-word phrases additionally get:
/// - one variant per aliased sub-phrase swapped for each of its aliases
///   (`"ci cd pipelines"` ⇒ `"cicd pipelines"`)
/// - one variant with every aliasable token swapped and the tokens re-joined
///   (`"postgres k8s"` ⇒ `"postgresql kubernetes"`)
pub fn variants(skill: &str) -> BTreeSet<String> {
    let base = normalize(skill);
    let mut out = BTreeSet::new();
    if base.is_empty() {
        return out;
    }

    if let Some(group) = alias_group(&base) {
        out.extend(group);
    }
    out.insert(base.clone());

    let parts: Vec<&str> = tokens(&base).collect();
    if parts.len() < 2 {
        return out;
    }

    let padded = format!(" {base} ");
    for group in ALIAS_GROUPS {
        let members: Vec<String> = group.iter().map(|m| normalize(m)).collect();
        for member in members.iter().filter(|m| contains_phrase(&base, m)) {
            for alias in members.iter().filter(|a| *a != member) {
                let swapped = padded.replacen(&format!(" {member} "), &format!(" {alias} "), 1);
                out.insert(swapped.trim().to_string());
            }
        }
    }

    let joined = parts
        .iter()
        .map(|part| {
            token_variants(part)
                .into_iter()
                .find(|v| v != part)
                .unwrap_or_else(|| part.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ");
    out.insert(joined);

    out
}

/// Single-token alias expansion: the normalized token plus any single-token
/// aliases from its group. Multi-word aliases (`"rest api"`) are excluded.
pub fn token_variants(token: &str) -> BTreeSet<String> {
    let t = normalize(token);
    let mut out = BTreeSet::new();
    if t.is_empty() {
        return out;
    }
    if let Some(group) = alias_group(&t) {
        out.extend(group.into_iter().filter(|m| !m.contains(' ')));
    }
    out.insert(t);
    out
}
