//! OR-group parsing for query-parameter names.
//!
//! Parameters prefixed `orN-` (N a positive integer, optionally
//! zero-padded) are filtered in a separate group whose results are
//! unioned with the other groups. `or-`, `or0-`, `or00-` and friends are
//! spellings of group 0, which also holds every unprefixed parameter.

use std::collections::{BTreeMap, BTreeSet};

use crate::params::QueryParams;

/// Split the `orN-` group prefix off a parameter name.
///
/// Returns the group id and the rest of the name, or `None` when the name
/// carries no group prefix. A digit run too large for `u32` is treated as
/// no prefix rather than an error.
#[must_use]
pub fn split_group_prefix(name: &str) -> Option<(u32, &str)> {
    let rest = name.strip_prefix("or")?;
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (digits, tail) = rest.split_at(digits_end);
    let tail = tail.strip_prefix('-')?;
    if digits.is_empty() {
        // Bare "or-" counts as group zero.
        return Some((0, tail));
    }
    let id = digits.parse().ok()?;
    Some((id, tail))
}

/// Group parameter names by their `orN-` prefix.
///
/// The result maps each discovered group id to the literal prefixes seen
/// for it; zero-padded spellings of the same id share a group. Group 0 is
/// always present, with an empty prefix set when only unprefixed names
/// occur.
pub fn query_groups<'a, I>(names: I) -> BTreeMap<u32, BTreeSet<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups = BTreeMap::from([(0, BTreeSet::new())]);
    for name in names {
        if let Some((id, rest)) = split_group_prefix(name) {
            let prefix = name[..name.len() - rest.len()].to_string();
            groups
                .entry(id)
                .or_default()
                .insert(prefix);
        }
    }
    groups
}

/// Collect the parameters belonging to one group, prefixes stripped.
///
/// Group 0 additionally keeps every genuinely unprefixed parameter,
/// unmodified.
#[must_use]
pub fn group_terms(params: &QueryParams, group_id: u32) -> QueryParams {
    let mut terms = QueryParams::new();
    for (name, value) in params {
        match split_group_prefix(name) {
            Some((id, rest)) if id == group_id => {
                terms.insert(rest.to_string(), value.clone());
            }
            None if group_id == 0 => {
                terms.insert(name.clone(), value.clone());
            }
            _ => {}
        }
    }
    terms
}
