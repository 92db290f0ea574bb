//! Pluggable validation for query parameters.
//!
//! Each OR-group's stripped parameters pass through a schema before
//! classification. The default schema accepts anything; consumers can
//! install a stricter one per [`crate::FilterSet`] via `with_schema`.
//! A schema failure aborts the whole request as a client error.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

use crate::params::QueryParams;

/// Suggested upper bound for [`max_value_length`] schemas.
pub const MAX_VALUE_LENGTH: usize = 10_000;

/// Validation error with the offending parameter and a message.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    /// The parameter that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Schema callable applied to one group's stripped parameters.
///
/// Returns the validated (possibly coerced) parameters, or the failure
/// that aborts the request.
pub type Schema = Box<dyn Fn(QueryParams) -> Result<QueryParams, ValidationError> + Send + Sync>;

/// The permissive default schema: accepts arbitrary keys and values.
///
/// # Errors
/// Never fails.
pub fn base_schema(params: QueryParams) -> Result<QueryParams, ValidationError> {
    Ok(params)
}

/// Schema builder that rejects parameters outside a closed key set.
///
/// The negation marker is stripped before the key is checked, so `~status`
/// passes when `status` is allowed.
pub fn allow_keys<I, K>(allowed: I) -> impl Fn(QueryParams) -> Result<QueryParams, ValidationError> + Send + Sync
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    let allowed: BTreeSet<String> = allowed.into_iter().map(Into::into).collect();
    move |params: QueryParams| {
        for name in params.keys() {
            let bare = name.replace('~', "");
            if !allowed.contains(&bare) {
                return Err(ValidationError::new(name, "unknown query parameter"));
            }
        }
        Ok(params)
    }
}

/// Schema builder that bounds the length of every scalar value and list
/// element.
pub fn max_value_length(
    limit: usize,
) -> impl Fn(QueryParams) -> Result<QueryParams, ValidationError> + Send + Sync {
    move |params: QueryParams| {
        for (name, value) in &params {
            let too_long = match value {
                Value::String(s) => s.len() > limit,
                Value::Array(items) => items
                    .iter()
                    .any(|item| item.as_str().is_some_and(|s| s.len() > limit)),
                _ => false,
            };
            if too_long {
                return Err(ValidationError::new(name, "value too long"));
            }
        }
        Ok(params)
    }
}

/// Basic field name validation, usable from custom schemas.
#[must_use]
pub fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= 100 && !name.starts_with('_') && !name.contains("..")
}
