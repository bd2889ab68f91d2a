//! Error types for the HTTP boundary
//!
//! Every error body has the `{"status": <negative>, "message": ...}` shape.
//! Internal details are logged, never returned.

use axum::{
    extract::{multipart::MultipartRejection, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::status;
use crate::services::{DecodeError, OrchestratorError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request or upload (400)
    #[error("{0}")]
    BadRequest(String),

    /// Classifier failure surfaced with its own status (500)
    #[error("classification failed ({status}): {message}")]
    Classification { status: i32, message: String },

    /// Internal server error (500), detail hidden from callers
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Pipeline failure
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        ApiError::BadRequest(format!("Failed to read picture file: {}", err))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, i32, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, status::BAD_REQUEST, msg.clone()),
            ApiError::Classification { status: code, message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, *code, message.clone())
            }
            ApiError::Internal(_) | ApiError::Orchestrator(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                status::SERVER_ERROR,
                "Server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (http_status, code, message) = self.parts();

        if http_status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "status": code,
            "message": message,
        }));

        (http_status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
