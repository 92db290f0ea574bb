//! The filter set: configuration plus the request-time pipeline.
//!
//! A `FilterSet` is built once per view and borrowed per request. The
//! pipeline per request is group, strip, validate, classify, compose,
//! union; every group composes against the same base queryset, and the
//! group results are ORed together.

use std::collections::BTreeMap;

use sea_orm::{Condition, DatabaseBackend, EntityTrait, QueryFilter, Select};
use serde_json::Value;

use crate::compose::group_condition;
use crate::errors::FilterError;
use crate::groups::{group_terms, query_groups};
use crate::lookup::Lookup;
use crate::params::QueryParams;
use crate::rules::classify_group;
use crate::validation::{Schema, base_schema};

/// Per-parameter value transformation, applied before classification.
pub type ValueTransform = Box<dyn Fn(Value) -> Value + Send + Sync>;

/// Declarative mapping from accepted query-parameter names to field
/// lookups, with optional value transforms and a validation schema.
///
/// ```
/// use filterset::{FilterSet, params_from_pairs};
///
/// let filters = FilterSet::new([
///     ("name", "name__icontains"),
///     ("status", "status"),
///     ("~status", "status"),
///     ("min_points", "points__gte"),
/// ]);
///
/// let params = params_from_pairs([("status", "open,closed")]);
/// let condition = filters
///     .build_condition(&params, sea_orm::DatabaseBackend::Sqlite)
///     .unwrap();
/// assert!(condition.is_some());
/// ```
pub struct FilterSet {
    mappings: BTreeMap<String, Lookup>,
    transforms: BTreeMap<String, ValueTransform>,
    schema: Schema,
}

impl FilterSet {
    /// Build a filter set from `(parameter name, lookup expression)`
    /// pairs. Names may carry the `~` negation marker.
    pub fn new<I, K, V>(mappings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mappings = mappings
            .into_iter()
            .map(|(name, expression)| (name.into(), Lookup::parse(expression.as_ref())))
            .collect();
        Self {
            mappings,
            transforms: BTreeMap::new(),
            schema: Box::new(base_schema),
        }
    }

    /// Install a value transform for one parameter name.
    ///
    /// The transform sees only the raw value, never the field name;
    /// field-specific behavior is configured by registering distinct
    /// transforms per name.
    #[must_use]
    pub fn with_transform(
        mut self,
        name: impl Into<String>,
        transform: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.transforms.insert(name.into(), Box::new(transform));
        self
    }

    /// Replace the permissive default schema.
    #[must_use]
    pub fn with_schema(
        mut self,
        schema: impl Fn(QueryParams) -> Result<QueryParams, crate::ValidationError> + Send + Sync + 'static,
    ) -> Self {
        self.schema = Box::new(schema);
        self
    }

    /// The accepted parameter names.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.mappings.keys().map(String::as_str)
    }

    /// Build the combined condition for a request's merged parameters.
    ///
    /// Returns `Ok(None)` when nothing filters: no mappings configured,
    /// no parameters supplied, or every group classified to an empty rule
    /// set. Otherwise the per-group conditions are ORed together.
    ///
    /// # Errors
    /// [`FilterError::Validation`] when any group's parameters fail the
    /// schema; the whole request aborts, even if other groups validate.
    pub fn build_condition(
        &self,
        params: &QueryParams,
        backend: DatabaseBackend,
    ) -> Result<Option<Condition>, FilterError> {
        if self.mappings.is_empty() || params.is_empty() {
            return Ok(None);
        }

        let groups = query_groups(params.keys().map(String::as_str));
        tracing::debug!(
            params = params.len(),
            groups = groups.len(),
            "building filter condition"
        );

        let mut union = Condition::any();
        let mut matched = false;
        for &group_id in groups.keys() {
            let terms = group_terms(params, group_id);
            let validated = (self.schema)(terms)?;
            let buckets = classify_group(&self.mappings, &self.transforms, &validated);
            if buckets.is_empty() {
                // An empty group must not widen the union to everything.
                continue;
            }
            union = union.add(group_condition(&buckets, backend));
            matched = true;
        }

        Ok(matched.then_some(union))
    }

    /// Apply the built condition to a queryset.
    ///
    /// The select stays lazy; this only narrows the query description.
    ///
    /// # Errors
    /// Same as [`FilterSet::build_condition`].
    pub fn apply_filters<E: EntityTrait>(
        &self,
        select: Select<E>,
        params: &QueryParams,
        backend: DatabaseBackend,
    ) -> Result<Select<E>, FilterError> {
        match self.build_condition(params, backend)? {
            Some(condition) => Ok(select.filter(condition)),
            None => Ok(select),
        }
    }
}
