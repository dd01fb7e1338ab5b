//! Error types for MedTrack server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Numeric error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchData = 4,
    Duplicate = 5,
    BadValue = 6,
    InvalidStatus = 7,
    InvalidState = 8,
    InvalidInput = 9,
    HasDependents = 10,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Status value outside the enumerated set of the target entity
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Operation attempted on an entity not in the required state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Malformed operation argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Delete refused because other rows still reference the entity
    #[error("Has dependents: {0}")]
    HasDependents(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for '{}'", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    fn parts(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::InvalidStatus(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidStatus, msg.clone())
            }
            AppError::InvalidState(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidState, msg.clone())
            }
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, msg.clone())
            }
            AppError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => (
                StatusCode::CONFLICT,
                ErrorCode::Duplicate,
                "A record with the same unique value already exists".to_string(),
            ),
            AppError::Database(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => (
                StatusCode::BAD_REQUEST,
                ErrorCode::HasDependents,
                "The record is still referenced by other records".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone()),
            AppError::HasDependents(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::HasDependents, msg.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_errors_are_client_errors() {
        for err in [
            AppError::InvalidStatus("BOGUS".into()),
            AppError::InvalidState("not completed".into()),
            AppError::InvalidInput("rating".into()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_error_codes() {
        let (_, code, _) = AppError::InvalidStatus("x".into()).parts();
        assert_eq!(code, ErrorCode::InvalidStatus);
        let (_, code, _) = AppError::InvalidState("x".into()).parts();
        assert_eq!(code, ErrorCode::InvalidState);
        let (_, code, _) = AppError::InvalidInput("x".into()).parts();
        assert_eq!(code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Authentication("x".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::HasDependents("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let (_, _, message) = AppError::Internal("secret detail".into()).parts();
        assert_eq!(message, "Internal server error");
    }
}
