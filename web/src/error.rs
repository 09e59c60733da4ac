//! Mapping of library errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use engine_core::EngineError;
use logbook::LogError;
use tracing::error;

use crate::types::ErrorResponse;

/// An error status with a JSON `{error, details?}` body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.into(),
                details: None,
            },
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.body.details = Some(details.into());
        self
    }

    /// Log-store failure while doing `action` (e.g. "creating log")
    ///
    /// Validation problems are the caller's fault and keep their message;
    /// anything else is a 500 carrying the cause in `details`.
    pub fn from_log(action: &str, e: LogError) -> Self {
        match e {
            LogError::Validation(message) => Self::bad_request(message),
            other => {
                error!(error = %other, "Error {}", action);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Error {}", action))
                    .with_details(other.to_string())
            }
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        match &e {
            EngineError::Rule(rule) => Self::bad_request(rule.to_string()),
            EngineError::Decode { .. } => Self::bad_request(e.to_string()),
            EngineError::UnknownGame(id) => Self::not_found(format!(
                "Game not found: {}. Use /games to list available games.",
                id
            )),
            EngineError::Encode { .. } => {
                error!(error = %e, "Game state encoding failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Game engine failure")
                    .with_details(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
