use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::tokens::name_tokens;
use crate::roster::{Record, Roster};

static FULL_NIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{8,20}").expect("valid regex"));
static NIP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]{2,17})\b").expect("valid regex"));

/// Indices of records whose NIP equals a run of 8 to 20 digits in the query.
#[must_use]
pub fn full_identifier_matches(roster: &Roster, query: &str) -> BTreeSet<usize> {
    let lowered = query.to_lowercase();
    let candidates: Vec<&str> = FULL_NIP.find_iter(&lowered).map(|m| m.as_str()).collect();
    if candidates.is_empty() {
        return BTreeSet::new();
    }
    roster
        .nip_keys()
        .iter()
        .enumerate()
        .filter(|(_, key)| candidates.contains(&key.as_str()))
        .map(|(idx, _)| idx)
        .collect()
}

/// Indices of records whose NIP starts with a standalone 2 to 17 digit number
/// in the query.
#[must_use]
pub fn identifier_prefix_matches(roster: &Roster, query: &str) -> BTreeSet<usize> {
    let lowered = query.to_lowercase();
    let prefixes: Vec<&str> = NIP_PREFIX
        .captures_iter(&lowered)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();
    if prefixes.is_empty() {
        return BTreeSet::new();
    }
    roster
        .nip_keys()
        .iter()
        .enumerate()
        .filter(|(_, key)| prefixes.iter().any(|p| key.starts_with(p)))
        .map(|(idx, _)| idx)
        .collect()
}

/// Indices of records whose name contains any query token, ignoring case.
#[must_use]
pub fn name_matches(roster: &Roster, query: &str) -> BTreeSet<usize> {
    let tokens = name_tokens(query);
    if tokens.is_empty() {
        return BTreeSet::new();
    }
    roster
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            record.name.as_deref().is_some_and(|name| {
                let name = name.to_lowercase();
                tokens.iter().any(|t| name.contains(t.as_str()))
            })
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Union of every matching rule, in roster order.
#[must_use]
pub fn select_records<'a>(roster: &'a Roster, query: &str) -> Vec<&'a Record> {
    let full = full_identifier_matches(roster, query);
    let prefix = identifier_prefix_matches(roster, query);
    let names = name_matches(roster, query);
    debug!(
        full = full.len(),
        prefix = prefix.len(),
        names = names.len(),
        "Record rules evaluated"
    );

    let mut matched = full;
    matched.extend(prefix);
    matched.extend(names);
    matched
        .into_iter()
        .filter_map(|idx| roster.get(idx))
        .collect()
}
