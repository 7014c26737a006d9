//! Error types for Booklib server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::repository::RepositoryError;

/// Value of the `status` field on every error envelope
pub const STATUS_ERROR: &str = "Error";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("empty body")]
    EmptyBody,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("error while creating book")]
    CreateFailed,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Path matched a route but its `{id}` segment is not numeric
    #[error("no route")]
    UnmatchedRoute,
}

/// Error response body
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Always `Error`
    pub status: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            error: message.into(),
        }
    }
}

impl AppError {
    /// HTTP status sent back for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmptyBody | AppError::BadRequest(_) | AppError::CreateFailed => {
                StatusCode::BAD_REQUEST
            }
            // Kept for compatibility with existing clients of the catalog API.
            AppError::Validation(_) => StatusCode::BAD_GATEWAY,
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UnmatchedRoute => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::UnmatchedRoute => return status.into_response(),
            AppError::Repository(e) => {
                tracing::error!(error = %e, "Repository error");
            }
            _ => {
                tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
            }
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
