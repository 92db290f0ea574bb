//! # filterset
//!
//! Dynamic query-parameter filtering for Axum and Sea-ORM list endpoints.
//! A view declares which parameters it accepts and which field lookups
//! they map to; per request, this crate turns the merged parameters into
//! one `sea_orm::Condition` applied to the base queryset.
//!
//! ## Parameter conventions
//!
//! ```rust,ignore
//! // Plain filter (lookup decides the comparison)
//! GET /fruits?name=app                  // name__icontains -> substring
//!
//! // CSV values: IN query, or per-value OR for substring-style lookups
//! GET /fruits?status=open,closed        // status IN ('open','closed')
//! GET /fruits?name=app,ban              // name LIKE %app% OR name LIKE %ban%
//!
//! // `~` in the accepted name negates: exclude instead of filter
//! GET /fruits?~status=archived
//!
//! // `orN-` prefixes partition parameters into groups whose results
//! // are unioned
//! GET /fruits?or1-status=open&or2-points__gte=10
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use filterset::{FilterSet, params_from_pairs};
//!
//! let filters = FilterSet::new([
//!     ("name", "name__icontains"),
//!     ("status", "status"),
//!     ("~status", "status"),
//!     ("min_points", "points__gte"),
//! ]);
//!
//! // In the list handler: merge path and query params, then apply.
//! let params = params_from_pairs(query_pairs);
//! let select = filters.apply_filters(Fruit::find(), &params, db.get_database_backend())?;
//! let rows = select.all(&db).await?;
//! ```
//!
//! Validation failures surface as [`FilterError`], which converts into a
//! `400 Bad Request` axum response. Unmapped parameters and empty values
//! never filter and never error.

mod compose;
pub mod errors;
pub mod groups;
pub mod lookup;
pub mod params;
pub mod rules;
pub mod set;
pub mod validation;

pub use errors::FilterError;
pub use set::{FilterSet, ValueTransform};
pub use lookup::{Lookup, LookupKind};
pub use params::{QueryParams, merge_params, params_from_pairs};
pub use rules::RuleBuckets;
pub use validation::{Schema, ValidationError, allow_keys, base_schema, max_value_length};
