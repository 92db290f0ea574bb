//! Field-lookup expressions.
//!
//! A lookup expression is a string such as `name__icontains` or
//! `status__in`: a column name plus an optional comparison suffix. The
//! suffixes form a closed set, [`LookupKind`], so the classifier can ask
//! structural questions (membership? per-value-comparable?) instead of
//! re-matching string tails.

use sea_orm::{
    DatabaseBackend,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};
use serde_json::Value;
use uuid::Uuid;

/// The comparison a lookup expression requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Equality (the default when no suffix is given)
    Exact,
    /// Case-insensitive equality
    IExact,
    /// Substring match
    Contains,
    /// Case-insensitive substring match
    IContains,
    /// Prefix match
    StartsWith,
    /// Case-insensitive prefix match
    IStartsWith,
    /// Suffix match
    EndsWith,
    /// Case-insensitive suffix match
    IEndsWith,
    /// Regular-expression match
    Regex,
    /// Case-insensitive regular-expression match
    IRegex,
    /// Membership in a list of values
    In,
    /// Not equal
    Ne,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// NULL check
    IsNull,
}

impl LookupKind {
    /// Parse a lookup suffix (without the `__` separator).
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "exact" => Some(Self::Exact),
            "iexact" => Some(Self::IExact),
            "contains" => Some(Self::Contains),
            "icontains" => Some(Self::IContains),
            "startswith" => Some(Self::StartsWith),
            "istartswith" => Some(Self::IStartsWith),
            "endswith" => Some(Self::EndsWith),
            "iendswith" => Some(Self::IEndsWith),
            "regex" => Some(Self::Regex),
            "iregex" => Some(Self::IRegex),
            "in" => Some(Self::In),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "isnull" => Some(Self::IsNull),
            _ => None,
        }
    }

    /// The suffix for this kind, or `None` for bare equality.
    #[must_use]
    pub const fn suffix(self) -> Option<&'static str> {
        match self {
            Self::Exact => None,
            Self::IExact => Some("iexact"),
            Self::Contains => Some("contains"),
            Self::IContains => Some("icontains"),
            Self::StartsWith => Some("startswith"),
            Self::IStartsWith => Some("istartswith"),
            Self::EndsWith => Some("endswith"),
            Self::IEndsWith => Some("iendswith"),
            Self::Regex => Some("regex"),
            Self::IRegex => Some("iregex"),
            Self::In => Some("in"),
            Self::Ne => Some("ne"),
            Self::Gt => Some("gt"),
            Self::Gte => Some("gte"),
            Self::Lt => Some("lt"),
            Self::Lte => Some("lte"),
            Self::IsNull => Some("isnull"),
        }
    }

    /// Whether a list value is applied per element and ORed together,
    /// rather than upgraded to a membership test.
    #[must_use]
    pub const fn per_value(self) -> bool {
        matches!(
            self,
            Self::IExact
                | Self::Contains
                | Self::IContains
                | Self::StartsWith
                | Self::IStartsWith
                | Self::EndsWith
                | Self::IEndsWith
                | Self::Regex
                | Self::IRegex
        )
    }

    /// Render this comparison against a column as a `SimpleExpr`.
    pub(crate) fn expr(self, field: &str, value: &Value, backend: DatabaseBackend) -> SimpleExpr {
        let col = || Expr::col(Alias::new(field));
        match self {
            Self::Exact => col().eq(scalar_value(value)),
            Self::Ne => col().ne(scalar_value(value)),
            Self::Gt => col().gt(scalar_value(value)),
            Self::Gte => col().gte(scalar_value(value)),
            Self::Lt => col().lt(scalar_value(value)),
            Self::Lte => col().lte(scalar_value(value)),
            Self::In => {
                let values: Vec<sea_orm::Value> = match value {
                    Value::Array(items) => items.iter().map(scalar_value).collect(),
                    other => vec![scalar_value(other)],
                };
                col().is_in(values)
            }
            Self::IsNull => {
                let text = text_value(value);
                if text.eq_ignore_ascii_case("false") || text == "0" {
                    col().is_not_null()
                } else {
                    col().is_null()
                }
            }
            Self::IExact => SimpleExpr::FunctionCall(Func::upper(col()))
                .eq(text_value(value).to_uppercase()),
            Self::Contains => col().like(format!("%{}%", escape_like_wildcards(&text_value(value)))),
            Self::IContains => SimpleExpr::FunctionCall(Func::upper(col())).like(format!(
                "%{}%",
                escape_like_wildcards(&text_value(value)).to_uppercase()
            )),
            Self::StartsWith => {
                col().like(format!("{}%", escape_like_wildcards(&text_value(value))))
            }
            Self::IStartsWith => SimpleExpr::FunctionCall(Func::upper(col())).like(format!(
                "{}%",
                escape_like_wildcards(&text_value(value)).to_uppercase()
            )),
            Self::EndsWith => col().like(format!("%{}", escape_like_wildcards(&text_value(value)))),
            Self::IEndsWith => SimpleExpr::FunctionCall(Func::upper(col())).like(format!(
                "%{}",
                escape_like_wildcards(&text_value(value)).to_uppercase()
            )),
            Self::Regex => {
                let pattern = text_value(value).replace('\'', "''");
                match backend {
                    DatabaseBackend::Postgres => {
                        SimpleExpr::Custom(format!("{field} ~ '{pattern}'"))
                    }
                    _ => SimpleExpr::Custom(format!("{field} REGEXP '{pattern}'")),
                }
            }
            Self::IRegex => {
                let pattern = text_value(value).replace('\'', "''");
                match backend {
                    DatabaseBackend::Postgres => {
                        SimpleExpr::Custom(format!("{field} ~* '{pattern}'"))
                    }
                    _ => SimpleExpr::Custom(format!("{field} REGEXP '{pattern}'")),
                }
            }
        }
    }
}

/// A parsed lookup expression: column name plus comparison kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    /// Column the comparison applies to
    pub field: String,
    /// The comparison itself
    pub kind: LookupKind,
}

impl Lookup {
    /// Parse a lookup expression string.
    ///
    /// An unrecognised tail folds into the field name with [`LookupKind::Exact`],
    /// matching the bare-field-means-equality convention.
    #[must_use]
    pub fn parse(expression: &str) -> Self {
        if let Some((field, suffix)) = expression.rsplit_once("__")
            && !field.is_empty()
            && let Some(kind) = LookupKind::from_suffix(suffix)
        {
            return Self {
                field: field.to_string(),
                kind,
            };
        }
        Self {
            field: expression.to_string(),
            kind: LookupKind::Exact,
        }
    }

    /// Render back to the `field__suffix` string form.
    #[must_use]
    pub fn expression(&self) -> String {
        match self.kind.suffix() {
            Some(suffix) => format!("{}__{suffix}", self.field),
            None => self.field.clone(),
        }
    }

    pub(crate) fn expr(&self, value: &Value, backend: DatabaseBackend) -> SimpleExpr {
        self.kind.expr(&self.field, value, backend)
    }
}

/// Convert a scalar parameter value into a database value.
///
/// Strings that parse as UUIDs are bound as UUIDs.
pub(crate) fn scalar_value(value: &Value) -> sea_orm::Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(uuid) = Uuid::parse_str(trimmed) {
                uuid.into()
            } else {
                s.clone().into()
            }
        }
        Value::Number(n) => {
            if let Some(int_value) = n.as_i64() {
                int_value.into()
            } else if let Some(float_value) = n.as_f64() {
                float_value.into()
            } else {
                n.to_string().into()
            }
        }
        Value::Bool(b) => (*b).into(),
        Value::Null => sea_orm::Value::String(None),
        other => other.to_string().into(),
    }
}

/// String form of a scalar value, for LIKE and regex patterns.
fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Escape LIKE wildcards so user input cannot widen a pattern.
fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
