//! HTTP error handling
//!
//! Handlers return `Result<_, ApiError>`; the error renders as a small HTML
//! page with the matching status code.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use core_kernel::PortError;
use thiserror::Error;

use crate::views;

/// HTTP error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the log
        let message = match &self {
            ApiError::NotFound(_) => "The page you requested does not exist.".to_string(),
            ApiError::Unauthorized => "Sign in to continue.".to_string(),
            ApiError::Conflict(msg) => msg.clone(),
            ApiError::ServiceUnavailable(_) | ApiError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                "Something went wrong. Please try again later.".to_string()
            }
        };

        let title = status.canonical_reason().unwrap_or("Error");
        (status, Html(views::error_page(title, &message))).into_response()
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{} {}", entity_type, id))
            }
            PortError::Conflict { message } => ApiError::Conflict(message),
            PortError::Connection { message, .. } => ApiError::ServiceUnavailable(message),
            PortError::Internal { message, .. } => ApiError::Internal(message),
        }
    }
}
