//! Request parameter containers and the decode layer.
//!
//! Filter values travel as [`serde_json::Value`] so that the rest of the
//! crate only has to distinguish scalar values from lists. Comma-bearing
//! query-string values are split into lists before they reach the
//! classifier; see [`params_from_pairs`].

use std::collections::BTreeMap;

use serde_json::Value;

/// Merged request parameters: name to scalar-or-list value.
///
/// Ordered so that classification and the rendered SQL are deterministic.
pub type QueryParams = BTreeMap<String, Value>;

/// Merge URL path parameters with query-string parameters.
///
/// Query-string entries win when both carry the same name.
#[must_use]
pub fn merge_params(url_params: &QueryParams, query_params: &QueryParams) -> QueryParams {
    let mut merged = url_params.clone();
    merged.extend(
        query_params
            .iter()
            .map(|(name, value)| (name.clone(), value.clone())),
    );
    merged
}

/// Build [`QueryParams`] from decoded `name=value` pairs, splitting
/// comma-separated values into lists.
///
/// ```
/// use filterset::params_from_pairs;
/// use serde_json::json;
///
/// let params = params_from_pairs([("status", "open,closed"), ("name", "ada")]);
/// assert_eq!(params["status"], json!(["open", "closed"]));
/// assert_eq!(params["name"], json!("ada"));
/// ```
pub fn params_from_pairs<I, K, V>(pairs: I) -> QueryParams
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: AsRef<str>,
{
    let mut params = QueryParams::new();
    for (name, raw) in pairs {
        let raw = raw.as_ref();
        let value = if raw.contains(',') {
            Value::Array(
                raw.split(',')
                    .map(|part| Value::String(part.to_string()))
                    .collect(),
            )
        } else {
            Value::String(raw.to_string())
        };
        params.insert(name.into(), value);
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_query_params_win() {
        let url_params = params_from_pairs([("id", "7"), ("status", "open")]);
        let query_params = params_from_pairs([("status", "closed")]);

        let merged = merge_params(&url_params, &query_params);
        assert_eq!(merged["id"], json!("7"));
        assert_eq!(merged["status"], json!("closed"));
    }

    #[test]
    fn test_csv_values_become_lists() {
        let params = params_from_pairs([("points", "1,2,3")]);
        assert_eq!(params["points"], json!(["1", "2", "3"]));
    }

    #[test]
    fn test_plain_values_stay_scalar() {
        let params = params_from_pairs([("name", "banana")]);
        assert_eq!(params["name"], json!("banana"));
    }
}
