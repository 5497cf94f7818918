//! Custom error types for the API service

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use common::error::DatabaseError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed field, unknown sort/filter field or operator
    #[error("{0}")]
    Validation(String),

    /// A unique field already holds this value
    #[error("Field {field} is unique and already registered with value: {value}")]
    Conflict { field: String, value: String },

    /// No entity matched
    #[error("{entity} with {field} {value} was not found")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Bad credentials or a rejected access token
    #[error("Could not validate credentials")]
    Unauthorized,

    /// Refresh or security token was invalid, expired or superseded
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The account is disabled
    #[error("Inactive user")]
    InactiveUser,

    /// Re-verification password did not match
    #[error("Incorrect password")]
    IncorrectPassword,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn conflict(field: impl Into<String>, value: impl Into<String>) -> Self {
        ApiError::Conflict {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        ApiError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken | ApiError::InactiveUser => StatusCode::FORBIDDEN,
            ApiError::IncorrectPassword | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalServerError | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Conflict { field, value } => json!({
                "error": self.to_string(),
                "field": field,
                "value": value,
            }),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                json!({ "error": "Internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };

        if matches!(self, ApiError::Unauthorized) {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], Json(body)).into_response();
        }

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
