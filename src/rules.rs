//! Classification of validated parameters into filter rules.
//!
//! Each parameter becomes one of four things: a plain filter, a plain
//! exclude, a sub-lookup filter, or a sub-lookup exclude. A `~` anywhere
//! in the parameter name routes it to the exclude side. Unmapped names
//! and empty values are skipped; unknown parameters do not filter.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::set::ValueTransform;
use crate::lookup::{Lookup, LookupKind};
use crate::params::QueryParams;

/// Rules for one OR-group.
///
/// Plain buckets are keyed by the rendered lookup expression (last write
/// wins, as with the parameter map itself); sub-lookup buckets are keyed
/// by base field and hold the comparison applied per value.
#[derive(Debug, Default)]
pub struct RuleBuckets {
    /// Plain filter rules
    pub filters: BTreeMap<String, (Lookup, Value)>,
    /// Plain exclude rules
    pub excludes: BTreeMap<String, (Lookup, Value)>,
    /// Per-value OR rules on the filter side
    pub sub_filters: BTreeMap<String, (LookupKind, Vec<Value>)>,
    /// Per-value OR rules on the exclude side
    pub sub_excludes: BTreeMap<String, (LookupKind, Vec<Value>)>,
}

impl RuleBuckets {
    /// True when no rule of any kind was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
            && self.excludes.is_empty()
            && self.sub_filters.is_empty()
            && self.sub_excludes.is_empty()
    }
}

/// Empty-ish values do not filter: null, `""`, `[]`, `{}`, `false`, zero.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Bucket one group's validated parameters.
///
/// The transform (identity when none is configured) runs before the
/// scalar-vs-list decision, so a transform may itself produce a list.
pub(crate) fn classify_group(
    mappings: &BTreeMap<String, Lookup>,
    transforms: &BTreeMap<String, ValueTransform>,
    validated: &QueryParams,
) -> RuleBuckets {
    let mut buckets = RuleBuckets::default();

    for (name, value) in validated {
        let Some(lookup) = mappings.get(name) else {
            continue;
        };
        if is_falsy(value) {
            continue;
        }
        let is_exclude = name.contains('~');
        let transformed = transforms
            .get(name)
            .map_or_else(|| value.clone(), |transform| transform(value.clone()));

        match transformed {
            Value::Array(values) if lookup.kind != LookupKind::In => {
                if lookup.kind.per_value() {
                    let target = if is_exclude {
                        &mut buckets.sub_excludes
                    } else {
                        &mut buckets.sub_filters
                    };
                    target.insert(lookup.field.clone(), (lookup.kind, values));
                } else {
                    // A list against a non-membership lookup upgrades to IN
                    // on the base field.
                    let upgraded = Lookup {
                        field: lookup.field.clone(),
                        kind: LookupKind::In,
                    };
                    let target = if is_exclude {
                        &mut buckets.excludes
                    } else {
                        &mut buckets.filters
                    };
                    target.insert(upgraded.expression(), (upgraded, Value::Array(values)));
                }
            }
            other => {
                let target = if is_exclude {
                    &mut buckets.excludes
                } else {
                    &mut buckets.filters
                };
                target.insert(lookup.expression(), (lookup.clone(), other));
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::params_from_pairs;
    use serde_json::json;

    fn mappings(entries: &[(&str, &str)]) -> BTreeMap<String, Lookup> {
        entries
            .iter()
            .map(|(name, expr)| ((*name).to_string(), Lookup::parse(expr)))
            .collect()
    }

    #[test]
    fn test_scalar_becomes_plain_filter() {
        let mappings = mappings(&[("status", "status")]);
        let params = params_from_pairs([("status", "open")]);
        let buckets = classify_group(&mappings, &BTreeMap::new(), &params);

        assert_eq!(buckets.filters.len(), 1);
        assert_eq!(buckets.filters["status"].1, json!("open"));
        assert!(buckets.excludes.is_empty());
    }

    #[test]
    fn test_negation_marker_routes_to_excludes() {
        let mappings = mappings(&[("~status", "status")]);
        let params = params_from_pairs([("~status", "closed")]);
        let buckets = classify_group(&mappings, &BTreeMap::new(), &params);

        assert!(buckets.filters.is_empty());
        assert_eq!(buckets.excludes.len(), 1);
        assert_eq!(buckets.excludes["status"].1, json!("closed"));
    }

    #[test]
    fn test_list_with_per_value_lookup_becomes_sub_rule() {
        let mappings = mappings(&[("name", "name__icontains")]);
        let params = params_from_pairs([("name", "app,ban")]);
        let buckets = classify_group(&mappings, &BTreeMap::new(), &params);

        assert!(buckets.filters.is_empty());
        let (kind, values) = &buckets.sub_filters["name"];
        assert_eq!(*kind, LookupKind::IContains);
        assert_eq!(values, &vec![json!("app"), json!("ban")]);
    }

    #[test]
    fn test_list_with_plain_lookup_upgrades_to_in() {
        let mappings = mappings(&[("status", "status")]);
        let params = params_from_pairs([("status", "open,closed")]);
        let buckets = classify_group(&mappings, &BTreeMap::new(), &params);

        let (lookup, value) = &buckets.filters["status__in"];
        assert_eq!(lookup.kind, LookupKind::In);
        assert_eq!(value, &json!(["open", "closed"]));
    }

    #[test]
    fn test_list_with_explicit_in_lookup_stays_plain() {
        let mappings = mappings(&[("status", "status__in")]);
        let params = params_from_pairs([("status", "open,closed")]);
        let buckets = classify_group(&mappings, &BTreeMap::new(), &params);

        assert!(buckets.sub_filters.is_empty());
        assert!(buckets.filters.contains_key("status__in"));
    }

    #[test]
    fn test_unmapped_and_falsy_parameters_skipped() {
        let mappings = mappings(&[("status", "status")]);
        let mut params = params_from_pairs([("unknown", "x")]);
        params.insert("status".to_string(), json!(""));
        let buckets = classify_group(&mappings, &BTreeMap::new(), &params);

        assert!(buckets.is_empty());
    }

    #[test]
    fn test_transform_runs_before_list_check() {
        let mappings = mappings(&[("name", "name__icontains")]);
        let mut transforms: BTreeMap<String, ValueTransform> = BTreeMap::new();
        transforms.insert(
            "name".to_string(),
            Box::new(|value| match value {
                Value::String(s) => {
                    Value::Array(s.split(';').map(|part| json!(part)).collect())
                }
                other => other,
            }),
        );
        let params = params_from_pairs([("name", "a;b")]);
        let buckets = classify_group(&mappings, &transforms, &params);

        let (_, values) = &buckets.sub_filters["name"];
        assert_eq!(values, &vec![json!("a"), json!("b")]);
    }
}
