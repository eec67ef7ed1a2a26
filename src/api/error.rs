use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;

/// Error body shared by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Unified error type for API handlers. Every handler returns
/// `Result<_, ApiError>`; the conversion to an HTTP response lives here so
/// handlers only decide *which* error occurred.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 with a single `detail` message (conflicts on toggle endpoints
    /// use this shape, matching the public API contract)
    #[error("{0}")]
    BadRequest(String),

    /// 400 with field-keyed validation messages
    #[error("validation failed")]
    Validation(BTreeMap<&'static str, Vec<String>>),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(diesel::result::Error),

    #[error("database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Single-field validation failure
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field, vec![message.into()]);
        ApiError::Validation(errors)
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => ApiError::NotFound("Not found."),
            other => ApiError::Database(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Pool(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
        }

        match self {
            ApiError::Validation(errors) => (status, Json(errors)).into_response(),
            // Don't leak internals to the client
            ApiError::Database(_) | ApiError::Pool(_) | ApiError::Internal(_) => (
                status,
                Json(ErrorDetail {
                    detail: "Internal server error.".to_string(),
                }),
            )
                .into_response(),
            other => (
                status,
                Json(ErrorDetail {
                    detail: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_builds_single_entry_map() {
        let err = ApiError::field("email", "Required field.");
        match err {
            ApiError::Validation(map) => {
                assert_eq!(map.len(), 1);
                assert_eq!(map["email"], vec!["Required field.".to_string()]);
            }
            _ => panic!("expected validation error"),
        }
    }

    #[test]
    fn not_found_from_diesel() {
        let err: ApiError = diesel::result::Error::NotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
