// Centralized error handling for the selector

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

/// Rejected input: nothing is mutated when one of these is returned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter format: {0}")]
    InvalidFormat(String),

    #[error("Parameter out of range: {0}")]
    OutOfRange(String),
}

/// Errors raised by roster operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User {0} is blacklisted and cannot be marked present")]
    Blacklisted(Uuid),

    #[error("User {0} is not present and cannot be paused")]
    NotPresent(Uuid),

    #[error("No eligible candidates for a draw")]
    EmptyPool,

    #[error("Draw produced {drawn} of {expected} winners, nothing was committed")]
    DrawIncomplete { expected: usize, drawn: usize },
}

impl RosterError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RosterError::Validation(_) => StatusCode::BAD_REQUEST,
            RosterError::NotFound(_) => StatusCode::NOT_FOUND,
            RosterError::Blacklisted(_) | RosterError::NotPresent(_) | RosterError::EmptyPool => {
                StatusCode::CONFLICT
            }
            RosterError::DrawIncomplete { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        use crate::models::api::ErrorResponse;
        use axum::response::Json;

        (
            self.status_code(),
            Json(ErrorResponse {
                success: false,
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        RosterError::from(self).into_response()
    }
}
