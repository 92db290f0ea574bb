//! Condition composition for one OR-group.
//!
//! Within a group everything ANDs: the OR of sub-lookup disjuncts, the
//! plain filters, and the negated exclude side. Sub-lookup rules expand
//! to one disjunct per listed value, so a row matches when any value
//! satisfies the comparison.

use sea_orm::{Condition, DatabaseBackend, sea_query::SimpleExpr};

use crate::rules::RuleBuckets;

/// Fold one group's rule buckets into a single condition.
///
/// Empty buckets compose to the empty all-condition, which matches
/// everything.
pub(crate) fn group_condition(buckets: &RuleBuckets, backend: DatabaseBackend) -> Condition {
    let mut condition = Condition::all();

    // Filter side: one disjunct per value per sub-lookup field. The
    // membership precondition for a shared base field needs no separate
    // clause here; the plain bucket contributes the identical `__in`
    // constraint below.
    let mut disjuncts: Vec<SimpleExpr> = Vec::new();
    for (field, (kind, values)) in &buckets.sub_filters {
        for value in values {
            disjuncts.push(kind.expr(field, value, backend));
        }
    }
    if !disjuncts.is_empty() {
        condition = condition.add(any_of(disjuncts));
    }
    for (lookup, value) in buckets.filters.values() {
        condition = condition.add(lookup.expr(value, backend));
    }

    // Exclude side. A membership exclude on a sub-lookup base field is a
    // precondition of its own: NOT(x IN ..) AND NOT(.. AND ..) is
    // strictly narrower than the combined clause alone.
    let mut excluded = Condition::all();
    let mut has_excludes = false;
    let mut exclude_disjuncts: Vec<SimpleExpr> = Vec::new();
    for (field, (kind, values)) in &buckets.sub_excludes {
        if let Some((membership, value)) = buckets.excludes.get(&format!("{field}__in")) {
            condition = condition.add(Condition::all().add(membership.expr(value, backend)).not());
        }
        for value in values {
            exclude_disjuncts.push(kind.expr(field, value, backend));
        }
    }
    if !exclude_disjuncts.is_empty() {
        excluded = excluded.add(any_of(exclude_disjuncts));
        has_excludes = true;
    }
    for (lookup, value) in buckets.excludes.values() {
        excluded = excluded.add(lookup.expr(value, backend));
        has_excludes = true;
    }
    if has_excludes {
        condition = condition.add(excluded.not());
    }

    condition
}

fn any_of(disjuncts: Vec<SimpleExpr>) -> Condition {
    disjuncts
        .into_iter()
        .fold(Condition::any(), Condition::add)
}
