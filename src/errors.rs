//! Client-facing errors for filter building.
//!
//! The only failure a filter set can produce is a validation failure,
//! which maps to `400 Bad Request` with the validator's detail attached.
//! Everything else that is wrong with a request (unmapped parameters,
//! empty values, malformed group prefixes) degrades silently instead of
//! erroring.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::validation::ValidationError;

/// Error produced while building a filter condition.
#[derive(Debug)]
pub enum FilterError {
    /// 400 Bad Request - a group's parameters failed schema validation
    Validation(ValidationError),
}

impl FilterError {
    /// Create a validation error
    #[must_use]
    pub fn validation(error: ValidationError) -> Self {
        Self::Validation(error)
    }

    /// The HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ValidationError> for FilterError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(error) => write!(f, "invalid query parameters: {error}"),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(error) => Some(error),
        }
    }
}

/// Error response sent to users
#[derive(Serialize)]
struct ErrorResponse {
    /// Error message
    error: String,
    /// The validation failure detail
    detail: ValidationError,
}

impl IntoResponse for FilterError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Validation(detail) => {
                tracing::warn!(
                    field = %detail.field,
                    message = %detail.message,
                    "query parameter validation failed"
                );
                let response = ErrorResponse {
                    error: "Invalid query parameters".to_string(),
                    detail,
                };
                (status, Json(response)).into_response()
            }
        }
    }
}
